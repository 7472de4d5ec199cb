//! Newtype wrappers and enums shared across the workspace.

pub mod contact;
pub mod price;
pub mod tag;

pub use contact::{Email, EmailError, PhoneError, PostalCode, PostalCodeError, ThaiPhone};
pub use price::{PriceToken, format_amount, format_amount_2dp};
pub use tag::ItemTag;
