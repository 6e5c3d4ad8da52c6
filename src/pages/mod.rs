mod browse;
mod item;
mod item_form;
mod profile;

pub use browse::BrowsePage;
pub use item::ItemPage;
pub use item_form::{CreateItemPage, EditItemPage};
pub use profile::{EditProfilePage, ProfilePage};
