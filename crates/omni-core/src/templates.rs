//! Static per-class description templates.
//!
//! Keys are lowercase class-name fragments. Lookup is a substring test against
//! the lowercased class name, in table order, so "tabby_cat" hits `cat` and the
//! first matching row wins when a name could match more than one key.

/// Ordered template table: `(key, candidate sentences)`.
pub static TEMPLATES: &[(&str, &[&str])] = &[
    (
        "laptop",
        &[
            "A laptop computer is visible in the image.",
            "The image shows a laptop, possibly being used for work.",
            "A modern laptop can be seen in this picture.",
        ],
    ),
    (
        "cat",
        &[
            "A cat is present in the image.",
            "The image features a cat, likely relaxing or playing.",
            "A feline companion can be seen in this picture.",
        ],
    ),
    (
        "dog",
        &[
            "A dog is visible in the image.",
            "The image shows a dog, possibly a pet or companion animal.",
            "A canine friend can be seen in this picture.",
        ],
    ),
    (
        "person",
        &[
            "A person is present in the image.",
            "The image features a person engaged in some activity.",
            "An individual can be seen in this picture.",
        ],
    ),
    (
        "car",
        &[
            "A car is visible in the image.",
            "The image shows an automobile, possibly parked or in motion.",
            "A vehicle can be seen in this picture.",
        ],
    ),
];

/// Find the first template row whose key is contained in `class_name`.
///
/// `class_name` must already be lowercased.
pub fn lookup(class_name: &str) -> Option<(&'static str, &'static [&'static str])> {
    TEMPLATES
        .iter()
        .find(|(key, _)| class_name.contains(key))
        .map(|(key, candidates)| (*key, *candidates))
}

/// Candidate sentences for an exact template key.
pub fn candidates(key: &str) -> Option<&'static [&'static str]> {
    TEMPLATES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, candidates)| *candidates)
}
