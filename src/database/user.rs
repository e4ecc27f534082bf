/// A user record as supplied by the identity service. Read-only here; rooms
/// reference users by id and embed this summary when serialized.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Model {
    /// The unique identifier for the user.
    pub id: i64,
    /// The username of the user.
    pub username: String,
    /// The email of the user.
    pub email: String,
}
