//! Resource dictionaries naming the fonts and images content streams use

use crate::graphics::ImageHandle;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::FontHandle;
use indexmap::IndexMap;

/// Handle to a resource dictionary owned by a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle(pub(crate) usize);

/// Fonts and image XObjects available to the content streams of a page
/// list or page.
///
/// Entries only refer to fonts and images; the same font may appear in
/// several dictionaries and is still written once.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    id: ObjectId,
    fonts: IndexMap<String, FontHandle>,
    images: IndexMap<String, ImageHandle>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn id_mut(&mut self) -> &mut ObjectId {
        &mut self.id
    }

    /// Registers `font` under `name`; registering a name again replaces it.
    pub fn add_font(&mut self, name: impl Into<String>, font: FontHandle) {
        self.fonts.insert(name.into(), font);
    }

    pub fn add_image(&mut self, name: impl Into<String>, image: ImageHandle) {
        self.images.insert(name.into(), image);
    }

    pub fn fonts(&self) -> impl Iterator<Item = (&str, FontHandle)> {
        self.fonts.iter().map(|(name, font)| (name.as_str(), *font))
    }

    pub fn images(&self) -> impl Iterator<Item = (&str, ImageHandle)> {
        self.images.iter().map(|(name, image)| (name.as_str(), *image))
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty() && self.images.is_empty()
    }

    /// Renders the dictionary, resolving handles to identities through
    /// `font_id` and `image_id`. Empty categories are left out.
    pub fn compile(
        &self,
        font_id: impl Fn(FontHandle) -> ObjectId,
        image_id: impl Fn(ImageHandle) -> ObjectId,
    ) -> String {
        let mut dict = Dictionary::new();
        if !self.fonts.is_empty() {
            let fonts: Dictionary = self
                .fonts
                .iter()
                .map(|(name, font)| (name.clone(), Object::Reference(font_id(*font))))
                .collect();
            dict.set("Font", fonts);
        }
        if !self.images.is_empty() {
            let images: Dictionary = self
                .images
                .iter()
                .map(|(name, image)| (name.clone(), Object::Reference(image_id(*image))))
                .collect();
            dict.set("XObject", images);
        }
        self.id.bracket(&dict.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectCounter;

    #[test]
    fn test_empty_resources() {
        let resources = Resources::new();
        assert!(resources.is_empty());
        assert_eq!(
            resources.compile(|_| ObjectId::unassigned(), |_| ObjectId::unassigned()),
            "0 0 obj\n<<>>\nendobj\n"
        );
    }

    #[test]
    fn test_fonts_and_images_in_insertion_order() {
        let mut counter = ObjectCounter::new();
        let mut resources = Resources::new();
        resources.id_mut().assign(&mut counter);
        resources.add_font("F1", FontHandle(1));
        resources.add_font("F0", FontHandle(0));
        resources.add_image("XI0", ImageHandle(0));

        assert!(resources.has_font("F0"));
        assert!(resources.has_image("XI0"));
        assert!(!resources.has_image("XI1"));

        let compiled = resources.compile(
            |font| ObjectId::new(10 + font.0 as u32, 0),
            |image| ObjectId::new(20 + image.0 as u32, 0),
        );
        assert_eq!(
            compiled,
            "3 0 obj\n<</Font <</F1 11 0 R /F0 10 0 R>> /XObject <</XI0 20 0 R>>>>\nendobj\n"
        );
    }

    #[test]
    fn test_reregistering_a_name_replaces_it() {
        let mut resources = Resources::new();
        resources.add_font("F0", FontHandle(0));
        resources.add_font("F0", FontHandle(4));
        let fonts: Vec<_> = resources.fonts().collect();
        assert_eq!(fonts, vec![("F0", FontHandle(4))]);
    }
}
