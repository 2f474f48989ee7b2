/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: Session token issuing and validation
/// - [`session`]: Cookie token → [`session::AuthContext`] resolution
/// - [`authorization`]: Project membership and role checks
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("MyP@ssw0rd!")?;
/// assert!(verify_password("MyP@ssw0rd!", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4()), "a-secret-key-of-at-least-32-bytes!")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod session;
