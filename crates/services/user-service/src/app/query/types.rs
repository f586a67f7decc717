use uuid::Uuid;

/// Read-side view of a user, decoupled from the domain entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

impl From<&domain::User> for User {
    fn from(user: &domain::User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
        }
    }
}
