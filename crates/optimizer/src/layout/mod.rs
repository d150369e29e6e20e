// ABOUTME: AMP layout keywords and the rules that derive an element's effective layout.
// ABOUTME: Re-exports CssLength and apply_layout used by the server-side rendering pass.

//! Static layout resolution for AMP custom elements.
//!
//! An element's `layout`, `width`, `height`, `sizes` and `heights` attributes
//! determine its effective [`Layout`]. When that layout can be expressed with
//! plain classes and inline styles, [`apply_layout`] writes them onto the
//! element so the page renders correctly before the runtime has loaded.

mod apply;
mod css_length;

pub use apply::apply_layout;
pub use css_length::CssLength;

use std::fmt;

/// Layout keywords accepted by the `layout` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Nodisplay,
    Fixed,
    FixedHeight,
    Responsive,
    Container,
    Fill,
    FlexItem,
    Fluid,
    Intrinsic,
}

/// A `layout` attribute value that names no known layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout: {0}")]
pub struct UnknownLayout(pub String);

impl Layout {
    /// Parse a `layout` attribute value. `Ok(None)` means no layout was
    /// declared.
    pub fn parse(value: Option<&str>) -> Result<Option<Layout>, UnknownLayout> {
        let Some(value) = value else {
            return Ok(None);
        };
        let layout = match value.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "nodisplay" => Layout::Nodisplay,
            "fixed" => Layout::Fixed,
            "fixed-height" => Layout::FixedHeight,
            "responsive" => Layout::Responsive,
            "container" => Layout::Container,
            "fill" => Layout::Fill,
            "flex-item" => Layout::FlexItem,
            "fluid" => Layout::Fluid,
            "intrinsic" => Layout::Intrinsic,
            _ => return Err(UnknownLayout(value.to_string())),
        };
        Ok(Some(layout))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Nodisplay => "nodisplay",
            Layout::Fixed => "fixed",
            Layout::FixedHeight => "fixed-height",
            Layout::Responsive => "responsive",
            Layout::Container => "container",
            Layout::Fill => "fill",
            Layout::FlexItem => "flex-item",
            Layout::Fluid => "fluid",
            Layout::Intrinsic => "intrinsic",
        }
    }

    /// Class the runtime would add for this layout.
    pub fn class_name(&self) -> String {
        format!("i-amphtml-layout-{}", self.as_str())
    }

    /// Layouts whose box size is known up front.
    pub fn is_size_defined(&self) -> bool {
        matches!(
            self,
            Layout::Fixed
                | Layout::FixedHeight
                | Layout::Responsive
                | Layout::Fill
                | Layout::FlexItem
                | Layout::Fluid
                | Layout::Intrinsic
        )
    }

    /// Layouts that can be rendered from attributes alone.
    pub fn is_statically_resolvable(&self) -> bool {
        !matches!(self, Layout::Fluid | Layout::Intrinsic)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Tags that are invisible and default to a 1x1 box.
const ONE_PIXEL_TAGS: &[&str] = &["amp-analytics", "amp-pixel"];

/// Effective width, filling in defaults for tags that need none declared.
pub fn calculate_width(layout: Option<Layout>, width: CssLength, tag: &str) -> CssLength {
    let fixed_or_unspecified = matches!(layout, None | Some(Layout::Fixed));
    if fixed_or_unspecified && !width.is_set && ONE_PIXEL_TAGS.contains(&tag) {
        return CssLength::px(1.0);
    }
    width
}

/// Effective height, filling in defaults for tags that need none declared.
pub fn calculate_height(layout: Option<Layout>, height: CssLength, tag: &str) -> CssLength {
    let fixed_like = matches!(
        layout,
        None | Some(Layout::Fixed) | Some(Layout::FixedHeight)
    );
    if fixed_like && !height.is_set && ONE_PIXEL_TAGS.contains(&tag) {
        return CssLength::px(1.0);
    }
    height
}

/// Effective layout: the declared one, or one inferred from the dimensions.
pub fn calculate_layout(
    layout: Option<Layout>,
    width: &CssLength,
    height: &CssLength,
    has_sizes: bool,
    has_heights: bool,
) -> Layout {
    if let Some(layout) = layout {
        return layout;
    }
    if !width.is_set && !height.is_set {
        return Layout::Container;
    }
    if height.is_set && (!width.is_set || width.is_auto) {
        return Layout::FixedHeight;
    }
    if height.is_set && width.is_set && (has_sizes || has_heights) {
        return Layout::Responsive;
    }
    Layout::Fixed
}

/// Whether the dimensions satisfy what the layout requires.
pub fn dimensions_fit(layout: Layout, width: &CssLength, height: &CssLength) -> bool {
    match layout {
        Layout::Fixed => width.is_definite() && height.is_definite(),
        Layout::FixedHeight => height.is_definite() && (!width.is_set || width.is_auto),
        Layout::Responsive => {
            width.is_definite()
                && height.is_definite()
                && width.unit == height.unit
                && width.numeral > 0.0
        }
        _ => true,
    }
}
