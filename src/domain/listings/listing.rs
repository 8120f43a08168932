use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Listing {
    pub id: i64,
    pub rubric_id: i64,
    pub rubric_name: String,
    pub title: String,
    pub content: String,
    pub price: f64,
    pub contacts: String,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct AdditionalImage {
    pub id: i64,
    pub listing_id: i64,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct ListingDetail {
    pub listing: Listing,
    pub images: Vec<AdditionalImage>,
}

/// Column values written on create/update. Author is set by the caller
/// from the authenticated user, never from request input.
#[derive(Debug, Clone)]
pub struct ListingFields {
    pub rubric_id: i64,
    pub title: String,
    pub content: String,
    pub price: f64,
    pub contacts: String,
    pub is_active: bool,
}
