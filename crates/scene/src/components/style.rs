/// RGB color with a separate alpha in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba(...)` form, as consumed by canvas renderers.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    /// Dash/gap lengths in pixels; `None` draws a solid line.
    pub line_dash: Option<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    pub src: String,
    pub rotation_deg: f64,
    pub rotate_with_view: bool,
    pub opacity: f32,
    pub size_px: Option<[f32; 2]>,
    pub scale: f32,
    /// Pixel anchor; `None` centers the image.
    pub anchor_px: Option<[f32; 2]>,
}

impl IconStyle {
    pub fn new(src: impl Into<String>, rotation_deg: f64, opacity: f32) -> Self {
        Self {
            src: src.into(),
            rotation_deg,
            rotate_with_view: true,
            opacity,
            size_px: None,
            scale: 1.0,
            anchor_px: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub offset_y_px: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub icon: IconStyle,
    pub text: Option<TextStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureStyle {
    Marker(MarkerStyle),
    Stroke(StrokeStyle),
}

impl FeatureStyle {
    /// Effective opacity: icon opacity for markers, color alpha for strokes.
    pub fn opacity(&self) -> f32 {
        match self {
            FeatureStyle::Marker(m) => m.icon.opacity,
            FeatureStyle::Stroke(s) => s.color.a,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity() > 0.0
    }

    pub fn as_marker(&self) -> Option<&MarkerStyle> {
        match self {
            FeatureStyle::Marker(m) => Some(m),
            FeatureStyle::Stroke(_) => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&StrokeStyle> {
        match self {
            FeatureStyle::Stroke(s) => Some(s),
            FeatureStyle::Marker(_) => None,
        }
    }
}
