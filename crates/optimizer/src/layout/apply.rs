// ABOUTME: Writes statically resolved layout classes, styles and sizers onto custom elements.
// ABOUTME: Every check runs before the first mutation so failures leave the element untouched.

use crate::dom::{Document, NodeId};

use super::{calculate_height, calculate_layout, calculate_width, dimensions_fit, CssLength, Layout};

const LAYOUT_ATTR: &str = "i-amphtml-layout";
const SIZE_DEFINED_CLASS: &str = "i-amphtml-layout-size-defined";
const SIZER_TAG: &str = "i-amphtml-sizer";

/// Resolve the element's declared layout and write it out as static markup.
///
/// Returns false, without touching the document, when the layout is unknown,
/// the dimensions are invalid for it, or it needs a browser to compute.
pub fn apply_layout(doc: &mut Document, node: NodeId) -> bool {
    let Some(el) = doc.element(node) else {
        return false;
    };
    let tag = el.name().to_string();

    let Ok(declared) = Layout::parse(el.attr("layout")) else {
        return false;
    };
    let allow_fluid = declared == Some(Layout::Fluid);
    let input_width = CssLength::parse(el.attr("width"), true, false);
    if !input_width.is_valid {
        return false;
    }
    let input_height = CssLength::parse(el.attr("height"), false, allow_fluid);
    if !input_height.is_valid {
        return false;
    }
    let width = calculate_width(declared, input_width, &tag);
    let height = calculate_height(declared, input_height, &tag);
    let layout = calculate_layout(
        declared,
        &width,
        &height,
        el.has_attr("sizes"),
        el.has_attr("heights"),
    );

    if !layout.is_statically_resolvable() || !dimensions_fit(layout, &width, &height) {
        return false;
    }

    apply(doc, node, layout, &width, &height);
    tracing::trace!(tag = %tag, layout = %layout, "applied layout");
    true
}

fn apply(doc: &mut Document, node: NodeId, layout: Layout, width: &CssLength, height: &CssLength) {
    let styles = match layout {
        Layout::Fixed => format!("width:{};height:{};", width, height),
        Layout::FixedHeight => format!("height:{};", height),
        Layout::FlexItem => {
            let mut s = String::new();
            if width.is_definite() {
                s.push_str(&format!("width:{};", width));
            }
            if height.is_definite() {
                s.push_str(&format!("height:{};", height));
            }
            s
        }
        _ => String::new(),
    };

    doc.update_element(node, |el| {
        let mut class = el.attr("class").unwrap_or_default().trim().to_string();
        for added in [
            Some(layout.class_name()),
            layout.is_size_defined().then(|| SIZE_DEFINED_CLASS.to_string()),
        ]
        .into_iter()
        .flatten()
        {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str(&added);
        }
        el.set_attr("class", class);

        if !styles.is_empty() {
            let existing = el.attr("style").unwrap_or_default();
            let style = format!("{}{}", styles, existing);
            el.set_attr("style", style);
        }
        if layout == Layout::Nodisplay {
            el.set_attr("hidden", "hidden");
        }
        el.set_attr(LAYOUT_ATTR, layout.as_str());
    });

    if layout == Layout::Responsive {
        let padding = height.numeral / width.numeral * 100.0;
        let sizer = doc.create_element(SIZER_TAG);
        doc.set_attr(
            sizer,
            "style",
            format!("display:block;padding-top:{:.4}%;", padding),
        );
        let first = doc.first_child(node);
        doc.insert_before(node, sizer, first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(markup: &str) -> (Document, NodeId) {
        let doc = Document::parse(&format!(
            "<html><head></head><body>{}</body></html>",
            markup
        ));
        let body = doc.body().unwrap();
        let node = doc.first_child(body).unwrap();
        (doc, node)
    }

    fn attr(doc: &Document, node: NodeId, name: &str) -> Option<String> {
        doc.element(node)
            .and_then(|el| el.attr(name))
            .map(str::to_string)
    }

    #[test]
    fn fixed_gets_inline_size() {
        let (mut doc, node) = single(r#"<amp-img layout="fixed" width="10" height="20"></amp-img>"#);
        assert!(apply_layout(&mut doc, node));
        assert_eq!(attr(&doc, node, "style").unwrap(), "width:10px;height:20px;");
        assert_eq!(
            attr(&doc, node, "class").unwrap(),
            "i-amphtml-layout-fixed i-amphtml-layout-size-defined"
        );
        assert_eq!(attr(&doc, node, "i-amphtml-layout").unwrap(), "fixed");
    }

    #[test]
    fn inferred_fixed_keeps_existing_class_and_style() {
        let (mut doc, node) =
            single(r#"<amp-img class="hero" style="color:red" width="3em" height="2em"></amp-img>"#);
        assert!(apply_layout(&mut doc, node));
        assert_eq!(
            attr(&doc, node, "class").unwrap(),
            "hero i-amphtml-layout-fixed i-amphtml-layout-size-defined"
        );
        assert_eq!(
            attr(&doc, node, "style").unwrap(),
            "width:3em;height:2em;color:red"
        );
    }

    #[test]
    fn fixed_height_with_auto_width() {
        let (mut doc, node) = single(r#"<amp-ad width="auto" height="50"></amp-ad>"#);
        assert!(apply_layout(&mut doc, node));
        assert_eq!(attr(&doc, node, "i-amphtml-layout").unwrap(), "fixed-height");
        assert_eq!(attr(&doc, node, "style").unwrap(), "height:50px;");
    }

    #[test]
    fn responsive_inserts_sizer_first() {
        let (mut doc, node) = single(
            r#"<amp-img layout="responsive" width="400" height="300"><span>x</span></amp-img>"#,
        );
        assert!(apply_layout(&mut doc, node));
        let sizer = doc.first_child(node).unwrap();
        assert_eq!(
            doc.outer_html(sizer),
            r#"<i-amphtml-sizer style="display:block;padding-top:75.0000%;"></i-amphtml-sizer>"#
        );
        assert_eq!(doc.tag_name(doc.next_sibling(sizer).unwrap()), Some("span"));
        assert_eq!(attr(&doc, node, "style"), None);
    }

    #[test]
    fn nodisplay_is_hidden() {
        let (mut doc, node) = single(r#"<amp-lightbox layout="nodisplay"></amp-lightbox>"#);
        assert!(apply_layout(&mut doc, node));
        assert_eq!(attr(&doc, node, "hidden").unwrap(), "hidden");
        assert_eq!(attr(&doc, node, "class").unwrap(), "i-amphtml-layout-nodisplay");
    }

    #[test]
    fn container_without_dimensions() {
        let (mut doc, node) = single("<amp-list></amp-list>");
        assert!(apply_layout(&mut doc, node));
        assert_eq!(attr(&doc, node, "class").unwrap(), "i-amphtml-layout-container");
        assert_eq!(attr(&doc, node, "style"), None);
    }

    #[test]
    fn pixel_defaults_to_one_by_one() {
        let (mut doc, node) = single(r#"<amp-pixel src="https://example.com/p"></amp-pixel>"#);
        assert!(apply_layout(&mut doc, node));
        assert_eq!(attr(&doc, node, "style").unwrap(), "width:1px;height:1px;");
    }

    #[test]
    fn failures_leave_element_untouched() {
        for markup in [
            r#"<amp-img layout="bogus" width="1" height="1"></amp-img>"#,
            r#"<amp-img layout="fixed" width="1"></amp-img>"#,
            r#"<amp-img layout="fixed" width="ten" height="1"></amp-img>"#,
            r#"<amp-img width="1" height="auto"></amp-img>"#,
            r#"<amp-img layout="responsive" width="1em" height="1px"></amp-img>"#,
            r#"<amp-img layout="intrinsic" width="1" height="1"></amp-img>"#,
            r#"<amp-ad layout="fluid" height="fluid"></amp-ad>"#,
        ] {
            let (mut doc, node) = single(markup);
            let before = doc.to_html();
            assert!(!apply_layout(&mut doc, node), "{markup}");
            assert_eq!(doc.to_html(), before);
        }
    }

    #[test]
    fn text_nodes_are_rejected() {
        let (mut doc, node) = single("just text");
        assert!(!apply_layout(&mut doc, node));
    }
}
