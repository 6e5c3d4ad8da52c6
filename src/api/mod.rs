use crate::models::{
    BookmarkRequest, CreatedItemEnvelope, Item, ItemEnvelope, ItemListEnvelope, User,
    UserEnvelope,
};
use crate::util::{parse_price, PriceError};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Failure of a backend call.
///
/// Transport failures and non-success statuses are both errors; callers are
/// not expected to tell them apart beyond logging.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }

    fn http(status: reqwest::StatusCode, body: String) -> Self {
        Self::Http {
            status: status.as_u16(),
            body,
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub chat_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let api_url = read_env_string(&["API_URL", "api_url"])
            .or_else(page_origin)
            .unwrap_or_else(|| "http://localhost:5000".to_string());
        let api_url = api_url.trim_end_matches('/').to_string();

        let chat_url = read_env_string(&["CHAT_URL", "chat_url"])
            .unwrap_or_else(|| chat_url_for(&api_url));

        Self { api_url, chat_url }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// First string found under `window.ENV[key]`, trying keys in order.
fn read_env_string(keys: &[&str]) -> Option<String> {
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    keys.iter().find_map(|k| {
        js_sys::Reflect::get(&env, &(*k).into())
            .ok()
            .and_then(|v| v.as_string())
    })
}

fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

/// WebSocket endpoint served next to the REST API.
pub(crate) fn chat_url_for(api_url: &str) -> String {
    let base = api_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws_base}/ws/chat")
}

/// `/api/items` with the optional search text and seller filter.
pub(crate) fn items_path(query: Option<&str>, seller_id: Option<i64>) -> String {
    let mut params: Vec<String> = Vec::new();
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        params.push(format!("q={}", urlencoding::encode(q)));
    }
    if let Some(id) = seller_id {
        params.push(format!("seller_id={id}"));
    }

    if params.is_empty() {
        "/api/items".to_string()
    } else {
        format!("/api/items?{}", params.join("&"))
    }
}

/// File picked in a form, already read into memory.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FileUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    fn into_part(self) -> ApiResult<Part> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(ApiError::parse)
    }
}

/// Fields shared by the create and edit item forms.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ItemFormData {
    pub name: String,
    pub description: String,
    pub price: String,
    pub condition: String,
    pub payment_options: Vec<String>,
    pub image: Option<FileUpload>,
}

impl ItemFormData {
    /// Must pass before the form is submitted.
    pub fn validate(&self) -> Result<f64, PriceError> {
        parse_price(&self.price)
    }

    /// Text fields in submission order; `payment_options` repeats per checked box.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            ("name", self.name.trim().to_string()),
            ("description", self.description.trim().to_string()),
            ("price", self.price.trim().to_string()),
            ("condition", self.condition.clone()),
        ];
        out.extend(
            self.payment_options
                .iter()
                .map(|p| ("payment_options", p.clone())),
        );
        out
    }

    fn into_form(self) -> ApiResult<Form> {
        let mut form = Form::new();
        for (k, v) in self.text_fields() {
            form = form.text(k, v);
        }
        if let Some(image) = self.image {
            form = form.part("image_file", image.into_part()?);
        }
        Ok(form)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().request(method, self.url(path))
    }

    async fn send(req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let res = req.send().await.map_err(ApiError::network)?;
        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body))
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        req: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let res = Self::send(req).await?;
        res.json().await.map_err(ApiError::parse)
    }

    /// For endpoints where only success matters; the body is not inspected.
    async fn fetch_ok(req: reqwest::RequestBuilder) -> ApiResult<()> {
        Self::send(req).await.map(|_| ())
    }

    pub async fn profile_me(&self) -> ApiResult<User> {
        let env: UserEnvelope =
            Self::fetch_json(self.builder(Method::GET, "/api/profile/me")).await?;
        Ok(env.user)
    }

    pub async fn profile(&self, user_id: i64) -> ApiResult<User> {
        let env: UserEnvelope = Self::fetch_json(
            self.builder(Method::GET, &format!("/api/profile/{user_id}")),
        )
        .await?;
        Ok(env.user)
    }

    pub async fn list_items(
        &self,
        query: Option<&str>,
        seller_id: Option<i64>,
    ) -> ApiResult<Vec<Item>> {
        let env: ItemListEnvelope =
            Self::fetch_json(self.builder(Method::GET, &items_path(query, seller_id))).await?;
        Ok(env.items)
    }

    pub async fn get_item(&self, item_id: i64) -> ApiResult<Item> {
        let env: ItemEnvelope =
            Self::fetch_json(self.builder(Method::GET, &format!("/api/items/{item_id}")))
                .await?;
        Ok(env.item)
    }

    /// Returns the new item's id when the backend included one.
    pub async fn create_item(&self, form: ItemFormData) -> ApiResult<Option<i64>> {
        let req = self
            .builder(Method::POST, "/api/items")
            .multipart(form.into_form()?);
        let env: CreatedItemEnvelope = Self::fetch_json(req).await?;
        Ok(env.item.and_then(|i| i.id))
    }

    pub async fn update_item(&self, item_id: i64, form: ItemFormData) -> ApiResult<()> {
        let req = self
            .builder(Method::PATCH, &format!("/api/items/{item_id}"))
            .multipart(form.into_form()?);
        Self::fetch_ok(req).await
    }

    pub async fn delete_item(&self, item_id: i64) -> ApiResult<()> {
        Self::fetch_ok(self.builder(Method::DELETE, &format!("/api/items/{item_id}"))).await
    }

    pub async fn set_bookmark(&self, item_id: i64, bookmarked: bool) -> ApiResult<()> {
        let req = self
            .builder(Method::POST, "/api/bookmark")
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&BookmarkRequest {
                item_id,
                bookmarked,
            });
        Self::fetch_ok(req).await
    }

    /// Posts the edit-profile form; the backend answers with a redirect page.
    pub async fn save_profile(&self, bio: &str, avatar: Option<FileUpload>) -> ApiResult<()> {
        let mut form = Form::new().text("profile_description", bio.trim().to_string());
        if let Some(avatar) = avatar {
            form = form.part("avatar", avatar.into_part()?);
        }
        Self::fetch_ok(self.builder(Method::POST, "/profile/edit").multipart(form)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_path_without_filters() {
        assert_eq!(items_path(None, None), "/api/items");
        assert_eq!(items_path(Some("   "), None), "/api/items");
    }

    #[test]
    fn test_items_path_encodes_query() {
        assert_eq!(items_path(Some("desk lamp"), None), "/api/items?q=desk%20lamp");
        assert_eq!(items_path(Some("a&b"), None), "/api/items?q=a%26b");
    }

    #[test]
    fn test_items_path_with_seller() {
        assert_eq!(items_path(None, Some(5)), "/api/items?seller_id=5");
        assert_eq!(
            items_path(Some("chair"), Some(5)),
            "/api/items?q=chair&seller_id=5"
        );
    }

    #[test]
    fn test_chat_url_for() {
        assert_eq!(chat_url_for("http://localhost:5000"), "ws://localhost:5000/ws/chat");
        assert_eq!(chat_url_for("https://shop.example/"), "wss://shop.example/ws/chat");
    }

    #[test]
    fn test_api_client_new_trims_slash() {
        let client = ApiClient::new("http://localhost:5000/".to_string());
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.url("/api/items"), "http://localhost:5000/api/items");
    }

    #[test]
    fn test_item_form_text_fields() {
        let form = ItemFormData {
            name: "  Bike ".to_string(),
            description: "Red".to_string(),
            price: "40".to_string(),
            condition: "Used".to_string(),
            payment_options: vec!["Cash".to_string(), "Zelle".to_string()],
            image: None,
        };
        let fields = form.text_fields();
        assert_eq!(fields[0], ("name", "Bike".to_string()));
        assert_eq!(fields[3], ("condition", "Used".to_string()));
        let payments: Vec<&str> = fields
            .iter()
            .filter(|(k, _)| *k == "payment_options")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(payments, vec!["Cash", "Zelle"]);
    }

    #[test]
    fn test_item_form_validate_price() {
        let with_price = |p: &str| ItemFormData {
            price: p.to_string(),
            ..Default::default()
        };
        assert_eq!(with_price("-5").validate(), Err(PriceError::Negative));
        assert_eq!(with_price("abc").validate(), Err(PriceError::NotANumber));
        assert_eq!(with_price("0").validate(), Ok(0.0));
    }

    #[test]
    fn test_api_error_display_carries_body() {
        let e = ApiError::Http {
            status: 404,
            body: "Item not found".to_string(),
        };
        assert_eq!(e.to_string(), "request failed (404): Item not found");
    }
}
