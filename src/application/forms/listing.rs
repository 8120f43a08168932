use crate::domain::listings::listing::ListingFields;

use super::{FormErrors, max_chars, require};

pub const TITLE_MAX: usize = 40;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    fn is_image(&self) -> bool {
        self.filename
            .as_deref()
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|m| m.type_() == mime_guess::mime::IMAGE)
            .unwrap_or(false)
    }
}

/// Raw listing form as submitted. Text fields stay as strings until `clean`.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub rubric: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub price: Option<String>,
    pub contacts: Option<String>,
    pub is_active: Option<String>,
    pub image: Option<UploadedFile>,
    pub clear_image: bool,
    pub images: Vec<UploadedFile>,
    pub delete_images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CleanListing {
    pub fields: ListingFields,
    pub image: Option<UploadedFile>,
    pub clear_image: bool,
    pub images: Vec<UploadedFile>,
    pub delete_images: Vec<i64>,
}

impl ListingForm {
    /// Rubric id as submitted, if it parses.
    pub fn rubric_id(&self) -> Option<i64> {
        self.rubric.as_deref().and_then(|s| s.trim().parse().ok())
    }

    /// Validates every field. `rubric_exists` tells whether `rubric_id()`
    /// names an existing sub rubric.
    pub fn clean(self, rubric_exists: bool, max_file_bytes: usize) -> Result<CleanListing, FormErrors> {
        let mut errors = FormErrors::new();

        let rubric_raw = self.rubric.as_deref().unwrap_or("");
        let rubric_id = self.rubric_id();
        if rubric_raw.trim().is_empty() {
            errors.add("rubric", super::REQUIRED);
        } else if rubric_id.is_none() || !rubric_exists {
            errors.add(
                "rubric",
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }

        let title = require(&mut errors, "title", self.title.as_deref().unwrap_or(""));
        max_chars(&mut errors, "title", title, TITLE_MAX);
        let content = require(&mut errors, "content", self.content.as_deref().unwrap_or(""));
        let contacts = require(&mut errors, "contacts", self.contacts.as_deref().unwrap_or(""));

        let price = match self.price.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    errors.add("price", "Enter a number.");
                    0.0
                }
            },
        };

        let is_active = match self.is_active.as_deref() {
            None => true,
            Some(raw) => match parse_bool(raw) {
                Some(v) => v,
                None => {
                    errors.add("is_active", "Enter a valid boolean.");
                    true
                }
            },
        };

        if let Some(file) = &self.image {
            check_file(&mut errors, "image", file, max_file_bytes);
        }
        for file in &self.images {
            check_file(&mut errors, "images", file, max_file_bytes);
        }

        let mut delete_images = Vec::with_capacity(self.delete_images.len());
        for raw in &self.delete_images {
            match raw.trim().parse::<i64>() {
                Ok(id) => delete_images.push(id),
                Err(_) => errors.add("delete_images", "Enter a whole number."),
            }
        }

        let fields = ListingFields {
            rubric_id: rubric_id.unwrap_or_default(),
            title: title.to_string(),
            content: content.to_string(),
            price,
            contacts: contacts.to_string(),
            is_active,
        };
        errors.finish(CleanListing {
            fields,
            image: self.image,
            clear_image: self.clear_image,
            images: self.images,
            delete_images,
        })
    }
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

fn check_file(errors: &mut FormErrors, field: &str, file: &UploadedFile, max_bytes: usize) {
    if file.bytes.is_empty() {
        errors.add(field, "The submitted file is empty.");
    } else if file.bytes.len() > max_bytes {
        errors.add(field, format!("File exceeds {} bytes.", max_bytes));
    }
    if !file.is_image() {
        errors.add(
            field,
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ListingForm {
        ListingForm {
            rubric: Some("3".into()),
            title: Some("Bicycle".into()),
            content: Some("Barely used".into()),
            price: Some("120.5".into()),
            contacts: Some("call me".into()),
            ..Default::default()
        }
    }

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            filename: Some(name.into()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn cleans_valid_form_with_defaults() {
        let clean = form().clean(true, 1024).unwrap();
        assert_eq!(clean.fields.rubric_id, 3);
        assert_eq!(clean.fields.price, 120.5);
        assert!(clean.fields.is_active);
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let mut f = form();
        f.price = None;
        assert_eq!(f.clean(true, 1024).unwrap().fields.price, 0.0);
    }

    #[test]
    fn unknown_rubric_is_rejected() {
        let errs = form().clean(false, 1024).unwrap_err();
        assert!(errs.has("rubric"));
    }

    #[test]
    fn required_fields_and_title_length() {
        let f = ListingForm {
            title: Some("x".repeat(TITLE_MAX + 1)),
            ..Default::default()
        };
        let errs = f.clean(false, 1024).unwrap_err();
        for field in ["rubric", "title", "content", "contacts"] {
            assert!(errs.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn rejects_non_numeric_price_and_bad_flag() {
        let mut f = form();
        f.price = Some("cheap".into());
        f.is_active = Some("maybe".into());
        let errs = f.clean(true, 1024).unwrap_err();
        assert!(errs.has("price"));
        assert!(errs.has("is_active"));
    }

    #[test]
    fn checkbox_values_are_understood() {
        let mut f = form();
        f.is_active = Some("off".into());
        assert!(!f.clean(true, 1024).unwrap().fields.is_active);
    }

    #[test]
    fn image_files_are_checked() {
        let mut f = form();
        f.image = Some(png("photo.png"));
        f.images = vec![png("notes.txt"), png("big.jpg")];
        let errs = f.clean(true, 3).unwrap_err();
        assert_eq!(errs.get("image").unwrap().len(), 1);
        let image_errs = errs.get("images").unwrap();
        // one for the text file, one for each oversized file
        assert_eq!(image_errs.len(), 3);
    }

    #[test]
    fn delete_ids_must_be_integers() {
        let mut f = form();
        f.delete_images = vec!["4".into(), "x".into()];
        assert!(f.clean(true, 1024).unwrap_err().has("delete_images"));
    }
}
