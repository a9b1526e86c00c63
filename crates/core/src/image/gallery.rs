//! Editor-local tracker for the images attached to a post in progress.

/// Ordered list of image URLs for the post being composed, plus the featured
/// image derived from it.
///
/// Pure in-memory state owned by the editor until save; operations cannot
/// fail. URLs are appended in upload *completion* order, which may differ
/// from submission order when a batch uploads concurrently - an accepted
/// source of nondeterminism in gallery ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    images: Vec<String>,
    featured: Option<String>,
}

impl Gallery {
    /// Creates an empty gallery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a gallery from a persisted post's image list and featured
    /// image (editing an existing post).
    #[must_use]
    pub fn from_parts(images: Vec<String>, featured: Option<String>) -> Self {
        Self { images, featured }
    }

    /// Appends an image URL.
    ///
    /// The first image added to an empty gallery with no featured image set
    /// becomes the featured image. Later additions never change it.
    pub fn add(&mut self, url: impl Into<String>) {
        let url = url.into();
        if self.images.is_empty() && self.featured.is_none() {
            self.featured = Some(url.clone());
        }
        self.images.push(url);
    }

    /// Removes all occurrences of an image URL.
    ///
    /// Featured reassignment follows [`featured_after_remove`]: if the
    /// removed URL was featured, the new first element takes over, or the
    /// featured image clears when nothing remains.
    pub fn remove(&mut self, url: &str) {
        self.images.retain(|img| img != url);
        self.featured = featured_after_remove(self.featured.as_deref(), url, &self.images);
    }

    /// The tracked image URLs, in insertion order.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// The current featured image, if any.
    #[must_use]
    pub fn featured(&self) -> Option<&str> {
        self.featured.as_deref()
    }

    /// Number of tracked images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the gallery is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Consumes the gallery into `(images, featured)` for saving.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Option<String>) {
        (self.images, self.featured)
    }
}

/// The featured image after removing `removed`, as a pure function of the
/// previous featured image and the list that remains.
fn featured_after_remove(
    previous: Option<&str>,
    removed: &str,
    remaining: &[String],
) -> Option<String> {
    match previous {
        Some(featured) if featured == removed => remaining.first().cloned(),
        other => other.map(String::from),
    }
}
