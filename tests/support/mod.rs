#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use esboard::application::ports::activation_notifier::ActivationNotifier;
use esboard::application::ports::listing_repository::{
    ListingRepository, ListingUpdate, UpdatedListing,
};
use esboard::application::ports::rubric_repository::RubricRepository;
use esboard::application::ports::user_repository::{NewUser, UserRepository, UsernameTaken};
use esboard::bootstrap::app_context::{AppContext, AppServices};
use esboard::bootstrap::config::Config;
use esboard::domain::listings::listing::{AdditionalImage, Listing, ListingFields};
use esboard::domain::rubrics::rubric::{Rubric, SubRubric};
use esboard::domain::users::user::{ProfileChanges, User};
use esboard::infrastructure::pages::FsPageStore;
use esboard::infrastructure::storage::port_impl::FsImageStorage;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "s3cret-pass";

// --- in-memory users ---

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<(User, String)>>,
    /// Makes `username_taken` answer false, as when a concurrent request
    /// claims the name between the check and the write.
    pub stale_username_checks: AtomicBool,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create_user(&self, new_user: &NewUser) -> anyhow::Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            is_active: false,
            is_activated: false,
            send_messages: new_user.send_messages,
            date_joined: chrono::Utc::now(),
        };
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(u, _)| u.username == user.username) {
            return Err(UsernameTaken.into());
        }
        rows.push((user.clone(), new_user.password_hash.clone()));
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<(User, String)>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(u, _)| u.username == username).cloned())
    }

    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(u, _)| u.id == id).map(|(_, h)| h.clone()))
    }

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> anyhow::Result<bool> {
        if self.stale_username_checks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .any(|(u, _)| u.username == username && Some(u.id) != except))
    }

    async fn mark_activated(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(u, _)| u.id == id) {
            Some((u, _)) => {
                u.is_active = true;
                u.is_activated = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|(u, _)| u.username == changes.username && u.id != id)
        {
            return Err(UsernameTaken.into());
        }
        Ok(rows.iter_mut().find(|(u, _)| u.id == id).map(|(u, _)| {
            u.username = changes.username.clone();
            u.email = changes.email.clone();
            u.first_name = changes.first_name.clone();
            u.last_name = changes.last_name.clone();
            u.send_messages = changes.send_messages;
            u.clone()
        }))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(u, _)| u.id == id) {
            Some((_, h)) => {
                *h = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(u, _)| u.id != id);
        Ok(rows.len() != before)
    }
}

// --- in-memory rubrics ---

pub struct MemoryRubrics {
    rows: Vec<Rubric>,
}

impl MemoryRubrics {
    /// Realty (1) > Flats (2), Houses (3); Transport (4) > Cars (5).
    pub fn seeded() -> Self {
        let r = |id: i64, name: &str, order: i16, parent: Option<i64>| Rubric {
            id,
            name: name.into(),
            order,
            super_rubric_id: parent,
        };
        Self {
            rows: vec![
                r(4, "Transport", 2, None),
                r(1, "Realty", 1, None),
                r(3, "Houses", 0, Some(1)),
                r(2, "Flats", 0, Some(1)),
                r(5, "Cars", 0, Some(4)),
            ],
        }
    }

    fn name_of(&self, id: i64) -> String {
        self.rows
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RubricRepository for MemoryRubrics {
    async fn list_all(&self) -> anyhow::Result<Vec<Rubric>> {
        Ok(self.rows.clone())
    }

    async fn get_sub_rubric(&self, id: i64) -> anyhow::Result<Option<SubRubric>> {
        let Some(r) = self.rows.iter().find(|r| r.id == id) else {
            return Ok(None);
        };
        let Some(parent_id) = r.super_rubric_id else {
            return Ok(None);
        };
        Ok(Some(SubRubric {
            id: r.id,
            name: r.name.clone(),
            order: r.order,
            super_rubric_id: parent_id,
            super_rubric_name: self.name_of(parent_id),
        }))
    }
}

// --- in-memory listings ---

#[derive(Default)]
struct ListingState {
    next_id: i64,
    next_image_id: i64,
    listings: BTreeMap<i64, Listing>,
    images: Vec<AdditionalImage>,
}

pub struct MemoryListings {
    rubric_names: BTreeMap<i64, String>,
    state: Mutex<ListingState>,
}

impl MemoryListings {
    pub fn new(rubrics: &MemoryRubrics) -> Self {
        Self {
            rubric_names: rubrics.rows.iter().map(|r| (r.id, r.name.clone())).collect(),
            state: Mutex::new(ListingState::default()),
        }
    }

    fn matches(l: &Listing, rubric_id: i64, keyword: Option<&str>) -> bool {
        let kw_ok = match keyword {
            Some(k) if !k.is_empty() => {
                let k = k.to_lowercase();
                l.title.to_lowercase().contains(&k) || l.content.to_lowercase().contains(&k)
            }
            _ => true,
        };
        l.is_active && l.rubric_id == rubric_id && kw_ok
    }

    fn newest_first(mut items: Vec<Listing>) -> Vec<Listing> {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items
    }

    fn apply_fields(&self, l: &mut Listing, fields: &ListingFields) {
        l.rubric_id = fields.rubric_id;
        l.rubric_name = self
            .rubric_names
            .get(&fields.rubric_id)
            .cloned()
            .unwrap_or_default();
        l.title = fields.title.clone();
        l.content = fields.content.clone();
        l.price = fields.price;
        l.contacts = fields.contacts.clone();
        l.is_active = fields.is_active;
    }
}

fn push_image(state: &mut ListingState, listing_id: i64, path: &str) {
    state.next_image_id += 1;
    let id = state.next_image_id;
    state.images.push(AdditionalImage {
        id,
        listing_id,
        image: path.to_string(),
    });
}

#[async_trait]
impl ListingRepository for MemoryListings {
    async fn list_latest_active(&self, limit: i64) -> anyhow::Result<Vec<Listing>> {
        let state = self.state.lock().unwrap();
        let active = state.listings.values().filter(|l| l.is_active).cloned().collect();
        Ok(Self::newest_first(active)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn count_active_in_rubric(
        &self,
        rubric_id: i64,
        keyword: Option<&str>,
    ) -> anyhow::Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .listings
            .values()
            .filter(|l| Self::matches(l, rubric_id, keyword))
            .count() as i64)
    }

    async fn list_active_in_rubric(
        &self,
        rubric_id: i64,
        keyword: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Listing>> {
        let state = self.state.lock().unwrap();
        let hits = state
            .listings
            .values()
            .filter(|l| Self::matches(l, rubric_id, keyword))
            .cloned()
            .collect();
        Ok(Self::newest_first(hits)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn list_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<Listing>> {
        let state = self.state.lock().unwrap();
        let own = state
            .listings
            .values()
            .filter(|l| l.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(own))
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Listing>> {
        Ok(self.state.lock().unwrap().listings.get(&id).cloned())
    }

    async fn get_owned(&self, id: i64, author_id: Uuid) -> anyhow::Result<Option<Listing>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .listings
            .get(&id)
            .filter(|l| l.author_id == author_id)
            .cloned())
    }

    async fn list_images(&self, listing_id: i64) -> anyhow::Result<Vec<AdditionalImage>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .images
            .iter()
            .filter(|i| i.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        author_id: Uuid,
        fields: &ListingFields,
        image: Option<&str>,
        extra_images: &[String],
    ) -> anyhow::Result<Listing> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let mut listing = Listing {
            id,
            rubric_id: 0,
            rubric_name: String::new(),
            title: String::new(),
            content: String::new(),
            price: 0.0,
            contacts: String::new(),
            image: image.map(str::to_string),
            author_id,
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        self.apply_fields(&mut listing, fields);
        state.listings.insert(id, listing.clone());
        for path in extra_images {
            push_image(&mut state, id, path);
        }
        Ok(listing)
    }

    async fn update_owned(
        &self,
        id: i64,
        author_id: Uuid,
        update: &ListingUpdate,
    ) -> anyhow::Result<Option<UpdatedListing>> {
        let mut state = self.state.lock().unwrap();
        let Some(mut listing) = state
            .listings
            .get(&id)
            .filter(|l| l.author_id == author_id)
            .cloned()
        else {
            return Ok(None);
        };
        let mut orphaned_paths = Vec::new();
        self.apply_fields(&mut listing, &update.fields);
        if let Some(new_image) = &update.image {
            if let Some(old) = listing.image.take() {
                if new_image.as_deref() != Some(old.as_str()) {
                    orphaned_paths.push(old);
                }
            }
            listing.image = new_image.clone();
        }
        state.images.retain(|img| {
            let remove = img.listing_id == id && update.remove_image_ids.contains(&img.id);
            if remove {
                orphaned_paths.push(img.image.clone());
            }
            !remove
        });
        for path in &update.add_images {
            push_image(&mut state, id, path);
        }
        state.listings.insert(id, listing.clone());
        Ok(Some(UpdatedListing {
            listing,
            orphaned_paths,
        }))
    }

    async fn delete_owned(&self, id: i64, author_id: Uuid) -> anyhow::Result<Option<Vec<String>>> {
        let mut state = self.state.lock().unwrap();
        match state.listings.get(&id) {
            Some(l) if l.author_id == author_id => {}
            _ => return Ok(None),
        }
        let Some(listing) = state.listings.remove(&id) else {
            return Ok(None);
        };
        let mut paths: Vec<String> = listing.image.into_iter().collect();
        state.images.retain(|img| {
            if img.listing_id == id {
                paths.push(img.image.clone());
                false
            } else {
                true
            }
        });
        Ok(Some(paths))
    }

    async fn image_paths_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let ids: Vec<i64> = state
            .listings
            .values()
            .filter(|l| l.author_id == author_id)
            .map(|l| l.id)
            .collect();
        let mut paths: Vec<String> = state
            .listings
            .values()
            .filter(|l| l.author_id == author_id)
            .filter_map(|l| l.image.clone())
            .collect();
        paths.extend(
            state
                .images
                .iter()
                .filter(|i| ids.contains(&i.listing_id))
                .map(|i| i.image.clone()),
        );
        Ok(paths)
    }
}

// --- notifier ---

/// Keeps every activation link instead of mailing it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ActivationNotifier for RecordingNotifier {
    async fn send_activation(&self, user: &User, activation_url: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((user.username.clone(), activation_url.to_string()));
        Ok(())
    }
}

impl RecordingNotifier {
    pub fn last_sign_for(&self, username: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(u, _)| u == username)
            .and_then(|(_, url)| url.rsplit('/').next().map(str::to_string))
    }
}

// --- app harness ---

pub fn test_config(uploads: &TempDir, pages: &TempDir) -> Config {
    Config {
        api_port: 8888,
        frontend_url: None,
        database_url: String::new(),
        jwt_secret_pem: SECRET.into(),
        jwt_expires_secs: 3600,
        activation_expires_secs: 3600,
        uploads_dir: uploads.path().to_string_lossy().to_string(),
        pages_dir: pages.path().to_string_lossy().to_string(),
        upload_max_bytes: 1024 * 1024,
        public_base_url: None,
        listings_per_page: 2,
        latest_listings_limit: 10,
        is_production: false,
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUsers>,
    pub notifier: Arc<RecordingNotifier>,
    pub uploads: TempDir,
    pub pages: TempDir,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = TempDir::new().unwrap();
        let pages = TempDir::new().unwrap();
        let cfg = test_config(&uploads, &pages);
        let notifier = Arc::new(RecordingNotifier::default());
        let users = Arc::new(MemoryUsers::default());
        let rubrics = MemoryRubrics::seeded();
        let listings = MemoryListings::new(&rubrics);
        let services = AppServices::new(
            users.clone(),
            Arc::new(rubrics),
            Arc::new(listings),
            Arc::new(FsImageStorage::new(uploads.path())),
            notifier.clone(),
            Arc::new(FsPageStore::new(pages.path())),
        );
        let ctx = AppContext::new(cfg, services);
        Self {
            router: esboard::presentation::http::router(ctx),
            users,
            notifier,
            uploads,
            pages,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Reply {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Value) -> Reply {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        self.send(req.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap())
            .await
    }

    pub async fn multipart(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        form: MultipartBody,
    ) -> Reply {
        let (content_type, body) = form.finish();
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .unwrap();
        self.send(req).await
    }

    pub async fn register(&self, username: &str) -> Reply {
        self.json(
            "POST",
            "/api/accounts/register",
            None,
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password1": PASSWORD,
                "password2": PASSWORD,
            }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Reply {
        self.json(
            "POST",
            "/api/accounts/login",
            None,
            json!({"username": username, "password": password}),
        )
        .await
    }

    /// Registers, activates and logs in; returns the access token.
    pub async fn user(&self, username: &str) -> String {
        assert_eq!(self.register(username).await.status, StatusCode::CREATED);
        let sign = self.notifier.last_sign_for(username).unwrap();
        let activated = self
            .get(&format!("/api/accounts/activate/{sign}"), None)
            .await;
        assert_eq!(activated.status, StatusCode::OK);
        let login = self.login(username, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK);
        login.body["access_token"].as_str().unwrap().to_string()
    }
}

// --- multipart body builder ---

pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "esboard-test-boundary".into(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The usual fields of a valid listing in `rubric`.
    pub fn listing(rubric: i64, title: &str) -> Self {
        Self::new()
            .text("rubric", &rubric.to_string())
            .text("title", title)
            .text("content", &format!("{title} in good condition"))
            .text("price", "100")
            .text("contacts", "+1 555 0100")
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
