//! Users

use crate::uuids::TypedUuid;

/// Cart owner, as resolved by the authentication layer.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
