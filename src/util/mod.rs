mod upload;

pub(crate) use upload::{crop_to_square_jpeg, read_selected_file, revoke_object_url, PreviewUrl};

use crate::models::{Item, PaymentMethod, Seller, User};

pub(crate) const ITEM_PLACEHOLDER: &str = "/static/assets/item_placeholder.svg";
pub(crate) const AVATAR_PLACEHOLDER: &str = "/static/assets/avatar.svg";
pub(crate) const BIO_PLACEHOLDER: &str = "No bio yet. Click “Edit profile” to add a public bio.";

/// `$` plus the price with two decimals; a missing price renders as zero.
pub(crate) fn format_price(price: Option<f64>) -> String {
    let p = price.filter(|p| p.is_finite()).unwrap_or(0.0);
    format!("${:.2}", p)
}

pub(crate) fn thumbnail_src(item: &Item) -> String {
    item.item_photos
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(ITEM_PLACEHOLDER)
        .to_string()
}

/// Short name shown on grid cards.
pub(crate) fn seller_display_name(seller: Option<&Seller>) -> String {
    match seller {
        Some(s) => s
            .first_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Seller")
            .to_string(),
        None => "Unknown Seller".to_string(),
    }
}

pub(crate) fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    format!("{} {}", first.unwrap_or(""), last.unwrap_or(""))
        .trim()
        .to_string()
}

pub(crate) fn profile_display_name(user: &User) -> String {
    let name = full_name(user.first_name.as_deref(), user.last_name.as_deref());
    if name.is_empty() {
        "User".to_string()
    } else {
        name
    }
}

/// Card icons in the order the methods were listed; unknown methods are skipped.
pub(crate) fn payment_icons(methods: &[String]) -> Vec<(PaymentMethod, String)> {
    methods
        .iter()
        .filter_map(|m| PaymentMethod::detect(m).map(|pm| (pm, m.clone())))
        .collect()
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub(crate) enum PriceError {
    #[error("Please enter a valid price.")]
    NotANumber,
    #[error("Price cannot be negative.")]
    Negative,
}

/// Client-side price check run before any create/edit request is sent.
pub(crate) fn parse_price(raw: &str) -> Result<f64, PriceError> {
    let value: f64 = raw.trim().parse().map_err(|_| PriceError::NotANumber)?;
    if !value.is_finite() {
        return Err(PriceError::NotANumber);
    }
    if value < 0.0 {
        return Err(PriceError::Negative);
    }
    Ok(value)
}

/// Whose profile a `/profile...` path refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ProfileTarget {
    Own,
    Other(i64),
    Invalid,
}

impl ProfileTarget {
    pub fn is_own(&self) -> bool {
        matches!(self, Self::Own)
    }
}

pub(crate) fn resolve_profile_target(path: &str) -> ProfileTarget {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        ["profile"] | ["profile", "edit"] => ProfileTarget::Own,
        ["profile", id] => id
            .parse::<i64>()
            .map(ProfileTarget::Other)
            .unwrap_or(ProfileTarget::Invalid),
        // Anything else falls back to the signed-in user.
        _ => ProfileTarget::Own,
    }
}

/// Source rectangle `(sx, sy, size)` of the centered square inside a `w`x`h` image.
pub(crate) fn square_crop_rect(width: f64, height: f64) -> (f64, f64, f64) {
    let size = width.min(height);
    ((width - size) / 2.0, (height - size) / 2.0, size)
}

pub(crate) fn current_year() -> u32 {
    js_sys::Date::new_0().get_full_year()
}

/// Blocking browser alert; used for validation and hard failures.
pub(crate) fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(Some(19.5)), "$19.50");
        assert_eq!(format_price(Some(3.0)), "$3.00");
        assert_eq!(format_price(Some(1234.0)), "$1234.00");
    }

    #[test]
    fn test_format_price_missing_is_zero() {
        assert_eq!(format_price(None), "$0.00");
        assert_eq!(format_price(Some(f64::NAN)), "$0.00");
    }

    #[test]
    fn test_seller_display_name_fallbacks() {
        assert_eq!(seller_display_name(None), "Unknown Seller");

        let nameless = Seller {
            id: 1,
            first_name: None,
            last_name: Some("Doe".to_string()),
        };
        assert_eq!(seller_display_name(Some(&nameless)), "Seller");

        let named = Seller {
            id: 1,
            first_name: Some("Jo".to_string()),
            last_name: None,
        };
        assert_eq!(seller_display_name(Some(&named)), "Jo");
    }

    #[test]
    fn test_profile_display_name_blank_is_user() {
        let user = User {
            id: 1,
            first_name: Some(" ".to_string()),
            last_name: None,
            profile_description: None,
            profile_image: None,
        };
        assert_eq!(profile_display_name(&user), "User");
        assert_eq!(full_name(Some("Ada"), Some("King")), "Ada King");
        assert_eq!(full_name(Some("Ada"), None), "Ada");
    }

    #[test]
    fn test_payment_icons_keep_order() {
        let icons = payment_icons(&["Venmo".to_string(), "Cash".to_string()]);
        let kinds: Vec<PaymentMethod> = icons.iter().map(|(m, _)| *m).collect();
        assert_eq!(kinds, vec![PaymentMethod::Venmo, PaymentMethod::Cash]);
        assert_eq!(icons[0].1, "Venmo");
    }

    #[test]
    fn test_payment_icons_skip_unknown() {
        assert!(payment_icons(&["Crypto".to_string()]).is_empty());
        assert_eq!(
            payment_icons(&["Crypto".to_string(), "Zelle".to_string()]).len(),
            1
        );
    }

    #[test]
    fn test_parse_price_rules() {
        assert_eq!(parse_price("-5"), Err(PriceError::Negative));
        assert_eq!(parse_price("abc"), Err(PriceError::NotANumber));
        assert_eq!(parse_price(""), Err(PriceError::NotANumber));
        assert_eq!(parse_price("inf"), Err(PriceError::NotANumber));
        assert_eq!(parse_price("0"), Ok(0.0));
        assert_eq!(parse_price(" 12.75 "), Ok(12.75));
    }

    #[test]
    fn test_price_error_messages() {
        assert_eq!(PriceError::NotANumber.to_string(), "Please enter a valid price.");
        assert_eq!(PriceError::Negative.to_string(), "Price cannot be negative.");
    }

    #[test]
    fn test_resolve_profile_target() {
        assert_eq!(resolve_profile_target("/profile"), ProfileTarget::Own);
        assert_eq!(resolve_profile_target("/profile/"), ProfileTarget::Own);
        assert_eq!(resolve_profile_target("/profile/edit"), ProfileTarget::Own);
        assert_eq!(resolve_profile_target("/profile/42"), ProfileTarget::Other(42));
        assert_eq!(resolve_profile_target("/profile/abc"), ProfileTarget::Invalid);
    }

    #[test]
    fn test_square_crop_rect() {
        assert_eq!(square_crop_rect(400.0, 300.0), (50.0, 0.0, 300.0));
        assert_eq!(square_crop_rect(200.0, 500.0), (0.0, 150.0, 200.0));
        assert_eq!(square_crop_rect(64.0, 64.0), (0.0, 0.0, 64.0));
    }
}
