//! Renderer-side visual element tree.
//!
//! A DOM-free stand-in for what the typesetting renderer produces: positioned
//! elements with class names, text and `data-*` attributes. Elements live in
//! an arena and are addressed by [`ElementId`], which doubles as the element
//! identity that a surface map indexes back to.

use super::geometry::BBox;
use bitflags::bitflags;
use std::collections::BTreeMap;

/// Index of an element in its [`VisualTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

bitflags! {
    /// Renderer class names relevant to classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassTags: u32 {
        const BASE = 1 << 0;
        const ORD = 1 << 1;
        const BIN = 1 << 2;
        const REL = 1 << 3;
        const OPEN = 1 << 4;
        const CLOSE = 1 << 5;
        const FRAC = 1 << 6;
        const FRAC_LINE = 1 << 7;
        const VLIST = 1 << 8;
        const STRUT = 1 << 9;
        const PSTRUT = 1 << 10;
        const SIZING = 1 << 11;
        const SPACER = 1 << 12;
        const NULL_DELIMITER = 1 << 13;
        const INNER = 1 << 14;
        const PUNCT = 1 << 15;

        /// Pure layout wrappers that never become surface nodes.
        const STRUCTURAL = Self::BASE.bits()
            | Self::VLIST.bits()
            | Self::STRUT.bits()
            | Self::PSTRUT.bits()
            | Self::SIZING.bits()
            | Self::SPACER.bits()
            | Self::NULL_DELIMITER.bits();
    }
}

static CLASS_TAGS: phf::Map<&'static str, ClassTags> = phf::phf_map! {
    "base" => ClassTags::BASE,
    "mord" => ClassTags::ORD,
    "mbin" => ClassTags::BIN,
    "mrel" => ClassTags::REL,
    "mopen" => ClassTags::OPEN,
    "mclose" => ClassTags::CLOSE,
    "mfrac" => ClassTags::FRAC,
    "frac-line" => ClassTags::FRAC_LINE,
    "vlist" => ClassTags::VLIST,
    "vlist-t" => ClassTags::VLIST,
    "vlist-t2" => ClassTags::VLIST,
    "vlist-r" => ClassTags::VLIST,
    "vlist-s" => ClassTags::VLIST,
    "strut" => ClassTags::STRUT,
    "pstrut" => ClassTags::PSTRUT,
    "sizing" => ClassTags::SIZING,
    "fontsize-ensurer" => ClassTags::SIZING,
    "mspace" => ClassTags::SPACER,
    "nulldelimiter" => ClassTags::NULL_DELIMITER,
    "minner" => ClassTags::INNER,
    "mpunct" => ClassTags::PUNCT,
};

impl ClassTags {
    /// Resolve renderer class names (`reset-size6`, `size3` count as sizing).
    pub fn from_class_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().fold(ClassTags::empty(), |acc, name| {
            if let Some(tag) = CLASS_TAGS.get(name) {
                acc | *tag
            } else if name.starts_with("reset-size") || is_size_class(name) {
                acc | ClassTags::SIZING
            } else {
                acc
            }
        })
    }
}

fn is_size_class(name: &str) -> bool {
    name.strip_prefix("size")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// One positioned element produced by the renderer.
#[derive(Debug, Clone, Default)]
pub struct VisualElement {
    /// Raw class names, as on the rendered element.
    pub classes: Vec<String>,
    /// Resolved tags for `classes`.
    pub tags: ClassTags,
    /// Own text content; `None` for containers.
    pub text: Option<String>,
    /// Absolute bounding box.
    pub bbox: BBox,
    /// `data-*` and other attributes.
    pub attributes: BTreeMap<String, String>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

impl VisualElement {
    pub fn new(classes: &[&str], bbox: BBox) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            tags: ClassTags::from_class_names(classes.iter().copied()),
            bbox,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Arena of visual elements with a single root.
#[derive(Debug, Clone)]
pub struct VisualTree {
    elements: Vec<VisualElement>,
    root: ElementId,
}

impl VisualTree {
    /// Create a tree whose root is `root` (usually the renderer's outer box).
    pub fn new(mut root: VisualElement) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            elements: vec![root],
            root: ElementId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Append `element` as the last child of `parent`.
    pub fn push(&mut self, parent: ElementId, mut element: VisualElement) -> ElementId {
        let id = ElementId(self.elements.len());
        element.parent = Some(parent);
        element.children.clear();
        self.elements.push(element);
        self.elements[parent.0].children.push(id);
        id
    }

    #[inline]
    pub fn get(&self, id: ElementId) -> Option<&VisualElement> {
        self.elements.get(id.0)
    }

    /// Element by id; ids always come from this tree.
    #[inline]
    pub fn element(&self, id: ElementId) -> &VisualElement {
        &self.elements[id.0]
    }

    /// Mutable element by id, for renderers finishing a layout.
    #[inline]
    pub fn element_mut(&mut self, id: ElementId) -> &mut VisualElement {
        &mut self.elements[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element ids in pre-order starting at `from`.
    pub fn descendants(&self, from: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.element(id).children.iter().rev().copied());
        }
        out
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: ElementId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|e| self.element(e).text.as_deref())
            .collect()
    }

    /// Top-most `base` groups, in document order.
    pub fn base_groups(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let element = self.element(id);
            if id != self.root && element.tags.contains(ClassTags::BASE) {
                out.push(id);
                continue;
            }
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_resolution() {
        let tags = ClassTags::from_class_names(["mord", "mtight", "reset-size6", "size3"]);
        assert!(tags.contains(ClassTags::ORD | ClassTags::SIZING));
        assert!(!tags.contains(ClassTags::BIN));
        assert!(ClassTags::from_class_names(["vlist-r"]).intersects(ClassTags::STRUCTURAL));
        assert!(ClassTags::from_class_names(["sizeable"]).is_empty());
    }

    #[test]
    fn test_tree_navigation() {
        let mut tree = VisualTree::new(VisualElement::new(&["katex-html"], BBox::default()));
        let base = tree.push(tree.root(), VisualElement::new(&["base"], BBox::default()));
        let two = tree.push(base, VisualElement::new(&["mord"], BBox::default()).with_text("2"));
        let plus = tree.push(base, VisualElement::new(&["mbin"], BBox::default()).with_text("+"));

        assert_eq!(tree.base_groups(), vec![base]);
        assert_eq!(tree.descendants(base), vec![base, two, plus]);
        assert_eq!(tree.text_content(base), "2+");
        assert_eq!(tree.element(two).parent, Some(base));
    }
}
