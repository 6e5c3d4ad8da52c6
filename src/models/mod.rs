use serde::{Deserialize, Serialize};

/// Seller summary embedded in item payloads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Seller {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Marketplace listing as returned by `/api/items`.
///
/// Every field except `id` tolerates being absent; the views fall back to
/// placeholders instead of failing the whole list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Item {
    pub id: i64,
    #[serde(default)]
    pub seller_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item_photos: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub payment_options: Vec<String>,
    #[serde(default)]
    pub bookmarked: bool,

    /// Computed server-side for the current viewer; only sent by `/api/items/:id`.
    #[serde(default)]
    pub is_owner: bool,

    #[serde(default)]
    pub seller: Option<Seller>,
}

impl Item {
    /// Seller id, preferring the flat column and falling back to the embedded seller.
    pub fn seller_ref(&self) -> Option<i64> {
        self.seller_id.or_else(|| self.seller.as_ref().map(|s| s.id))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_description: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub(crate) struct ItemListEnvelope {
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct ItemEnvelope {
    pub item: Item,
}

/// `POST /api/items` answers with the created item; only its id matters here.
#[derive(Deserialize, Clone, Debug, Default)]
pub(crate) struct CreatedItemEnvelope {
    #[serde(default)]
    pub item: Option<CreatedItem>,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct CreatedItem {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub(crate) struct BookmarkRequest {
    pub item_id: i64,
    pub bookmarked: bool,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
pub(crate) enum PaymentMethod {
    Venmo,
    Zelle,
    Cash,
}

impl PaymentMethod {
    /// Loose match used on cards: the first known name contained in `label`.
    pub fn detect(label: &str) -> Option<Self> {
        [Self::Venmo, Self::Zelle, Self::Cash]
            .into_iter()
            .find(|m| label.contains(m.as_ref()))
    }

    /// Strict match used on the detail page.
    pub fn exact(label: &str) -> Option<Self> {
        [Self::Cash, Self::Venmo, Self::Zelle]
            .into_iter()
            .find(|m| label == m.as_ref())
    }

    pub fn icon_src(self) -> &'static str {
        match self {
            Self::Venmo => "/static/assets/venmo.svg",
            Self::Zelle => "/static/assets/zelle.svg",
            Self::Cash => "/static/assets/cash.svg",
        }
    }
}

/// Conditions offered by the create/edit forms.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
pub(crate) enum Condition {
    #[default]
    New,
    #[strum(serialize = "Like New")]
    LikeNew,
    Good,
    Fair,
    Used,
}
