use std::fmt;

use serde::{Serialize, Serializer};

/// Inferred shape of a value.
///
/// Primitive tags come from literals. The remaining tags name a built-in
/// object either as its bare namespace (`Region`) or as a value produced by
/// calling into it (`Region()`, `Region().find()`). [`TypeTag::Any`] is the
/// explicit "could not classify" result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Any,

    Sys,
    Map,
    Math,
    Point,
    PointValue,
    SwipePointValue,
    MultiSwipe,
    MultiSwipeBuilder,
    Touch,
    Region,
    RegionValue,
    RegionMatch,
    RegionTextMatch,
    Template,
    TemplateBuilder,
    Setting,
    SettingBuilder,
    SettingDialog,
    OnScreenText,
    OnScreenTextValue,
    DateTime,
    DateTimeValue,
    TimeSpan,
    TimeSpanValue,
    StopwatchValue,
    ClipboardValue,
    OverlayValue,
    File,
    Cache,
    Env,
    VersionValue,
}

impl TypeTag {
    pub const ALL: [TypeTag; 37] = [
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Boolean,
        TypeTag::Null,
        TypeTag::Array,
        TypeTag::Any,
        TypeTag::Sys,
        TypeTag::Map,
        TypeTag::Math,
        TypeTag::Point,
        TypeTag::PointValue,
        TypeTag::SwipePointValue,
        TypeTag::MultiSwipe,
        TypeTag::MultiSwipeBuilder,
        TypeTag::Touch,
        TypeTag::Region,
        TypeTag::RegionValue,
        TypeTag::RegionMatch,
        TypeTag::RegionTextMatch,
        TypeTag::Template,
        TypeTag::TemplateBuilder,
        TypeTag::Setting,
        TypeTag::SettingBuilder,
        TypeTag::SettingDialog,
        TypeTag::OnScreenText,
        TypeTag::OnScreenTextValue,
        TypeTag::DateTime,
        TypeTag::DateTimeValue,
        TypeTag::TimeSpan,
        TypeTag::TimeSpanValue,
        TypeTag::StopwatchValue,
        TypeTag::ClipboardValue,
        TypeTag::OverlayValue,
        TypeTag::File,
        TypeTag::Cache,
        TypeTag::Env,
        TypeTag::VersionValue,
    ];

    /// Source text that classifies back to this tag. Used when a variable
    /// reference is substituted by its type before matching shapes.
    pub fn canonical(self) -> &'static str {
        match self {
            TypeTag::String => "\"\"",
            TypeTag::Number => "0",
            TypeTag::Boolean => "true",
            TypeTag::Null => "null",
            TypeTag::Array => "[]",
            TypeTag::Any => "any",
            TypeTag::Sys => "Sys",
            TypeTag::Map => "Map",
            TypeTag::Math => "Math",
            TypeTag::Point => "Point",
            TypeTag::PointValue => "Point()",
            TypeTag::SwipePointValue => "SwipePoint()",
            TypeTag::MultiSwipe => "MultiSwipe",
            TypeTag::MultiSwipeBuilder => "MultiSwipe.builder()",
            TypeTag::Touch => "Touch",
            TypeTag::Region => "Region",
            TypeTag::RegionValue => "Region()",
            TypeTag::RegionMatch => "Region().find()",
            TypeTag::RegionTextMatch => "Region().findText()",
            TypeTag::Template => "Template",
            TypeTag::TemplateBuilder => "Template.image()",
            TypeTag::Setting => "Setting",
            TypeTag::SettingBuilder => "Setting.builder()",
            TypeTag::SettingDialog => "Setting.builder().build()",
            TypeTag::OnScreenText => "OnScreenText",
            TypeTag::OnScreenTextValue => "OnScreenText()",
            TypeTag::DateTime => "DateTime",
            TypeTag::DateTimeValue => "DateTime()",
            TypeTag::TimeSpan => "TimeSpan",
            TypeTag::TimeSpanValue => "TimeSpan()",
            TypeTag::StopwatchValue => "Stopwatch()",
            TypeTag::ClipboardValue => "Clipboard()",
            TypeTag::OverlayValue => "Overlay()",
            TypeTag::File => "File",
            TypeTag::Cache => "Cache",
            TypeTag::Env => "Env",
            TypeTag::VersionValue => "Version()",
        }
    }

    /// Human readable name shown in hover and resolve details.
    pub fn label(self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Null => "null",
            TypeTag::Array => "array",
            TypeTag::Any => "any",
            other => other.canonical(),
        }
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeTag::String | TypeTag::Number | TypeTag::Boolean | TypeTag::Null | TypeTag::Array | TypeTag::Any
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
