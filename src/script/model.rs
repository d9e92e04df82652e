use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::action::registry::ActionArg;
use crate::foundation::color::Color;
use crate::foundation::core::{Interval, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};

/// Shape family named on the right-hand side of a cast line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    Square,
    Rect,
    RoundRect,
    Star,
    Dice,
    Label,
    Text,
    Circle,
    Triangle,
    Polygon,
    Bitmap,
}

impl Role {
    pub const ALL: [Role; 11] = [
        Role::Square,
        Role::Rect,
        Role::RoundRect,
        Role::Star,
        Role::Dice,
        Role::Label,
        Role::Text,
        Role::Circle,
        Role::Triangle,
        Role::Polygon,
        Role::Bitmap,
    ];

    /// Keyword used in scripts.
    pub fn name(self) -> &'static str {
        match self {
            Role::Square => "Square",
            Role::Rect => "Rect",
            Role::RoundRect => "RoundRect",
            Role::Star => "Star",
            Role::Dice => "Dice",
            Role::Label => "Label",
            Role::Text => "Text",
            Role::Circle => "Circle",
            Role::Triangle => "Triangle",
            Role::Polygon => "Polygon",
            Role::Bitmap => "Bitmap",
        }
    }

    /// Exact (case-sensitive) keyword lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One `keyword value` pair of a cast line.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "attr", content = "value", rename_all = "snake_case")]
pub enum Attr {
    Size(Vector),
    Pos(Vector),
    Num(u8),
    Side(f64),
    #[serde(rename = "fontsize")]
    FontSize(f64),
    Radius(f64),
    Width(f64),
    Height(f64),
    Text(String),
    Filename(String),
    Alpha(f64),
    Points(Vec<Vector>),
    Color(Color),
}

impl Attr {
    /// Script keyword of the attribute.
    pub fn keyword(&self) -> &'static str {
        match self {
            Attr::Size(_) => "size",
            Attr::Pos(_) => "pos",
            Attr::Num(_) => "num",
            Attr::Side(_) => "side",
            Attr::FontSize(_) => "fontsize",
            Attr::Radius(_) => "radius",
            Attr::Width(_) => "width",
            Attr::Height(_) => "height",
            Attr::Text(_) => "text",
            Attr::Filename(_) => "filename",
            Attr::Alpha(_) => "alpha",
            Attr::Points(_) => "points",
            Attr::Color(_) => "color",
        }
    }
}

/// `name = Role attr...`
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CastLine {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub attrs: Vec<Attr>,
}

/// `interval actor Action args...`
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionLine {
    pub interval: Interval,
    pub actor: String,
    pub action: String,
    #[serde(default)]
    pub args: Vec<ActionArg>,
}

/// Parsed Grafel script: cast declarations followed by the timeline.
///
/// Scripts are written in the `.grafel` text format or as the JSON form of this struct.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Script {
    pub cast: Vec<CastLine>,
    pub actions: Vec<ActionLine>,
    /// Directory relative bitmap file names are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Script {
    /// Parse `.grafel` source text.
    pub fn parse(src: &str) -> GrafelResult<Self> {
        crate::script::parser::parse_script(src)
    }

    /// Load a script file. `.json` files are read as the serialized model, anything else as
    /// `.grafel` text. Bitmaps resolve relative to the file's directory.
    pub fn from_path(path: &Path) -> GrafelResult<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let mut script = if is_json {
            serde_json::from_str::<Self>(&src)
                .with_context(|| format!("parse script json '{}'", path.display()))?
        } else {
            Self::parse(&src)?
        };
        script.base_dir = path.parent().map(Path::to_path_buf);
        tracing::debug!(
            path = %path.display(),
            actors = script.cast.len(),
            actions = script.actions.len(),
            "script loaded"
        );
        Ok(script)
    }

    pub fn to_json(&self) -> GrafelResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GrafelError::Other(anyhow::anyhow!("serialize script: {e}")))
    }
}
