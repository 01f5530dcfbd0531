use crate::session::identity::Role;

/// Default credential record written into the store on first run.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
}

/// Hard-coded demo login checked before the registered records.
///
/// Keeping these in a table supplied at startup keeps the login logic free
/// of literal test accounts.
#[derive(Debug, Clone)]
pub struct DemoAccount {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub profile_setup_complete: bool,
}

/// Fixed seed set: the default credential records plus the demo accounts.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub default_users: Vec<SeedUser>,
    pub demo_accounts: Vec<DemoAccount>,
}

impl SeedData {
    /// True when the email belongs to the fixed default record set.
    pub fn is_default_email(&self, email: &str) -> bool {
        self.default_users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self {
            default_users: vec![SeedUser {
                email: "demo@markethub.app".to_string(),
                password: "demo123".to_string(),
            }],
            demo_accounts: vec![
                DemoAccount {
                    id: "demo-admin".to_string(),
                    username: "demo".to_string(),
                    email: "demo@markethub.app".to_string(),
                    password: "demo123".to_string(),
                    role: Role::Admin,
                    profile_setup_complete: true,
                },
                DemoAccount {
                    id: "demo-user".to_string(),
                    username: "test".to_string(),
                    email: "test@markethub.app".to_string(),
                    password: "test123".to_string(),
                    role: Role::User,
                    profile_setup_complete: false,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_has_the_two_demo_accounts() {
        let seed = SeedData::default();
        let demo = seed.demo_accounts.iter().find(|a| a.username == "demo").unwrap();
        assert_eq!(demo.role, Role::Admin);
        assert!(demo.profile_setup_complete);

        let test = seed.demo_accounts.iter().find(|a| a.username == "test").unwrap();
        assert_eq!(test.role, Role::User);
        assert!(!test.profile_setup_complete);
    }

    #[test]
    fn default_email_check_is_case_insensitive() {
        let seed = SeedData::default();
        assert!(seed.is_default_email("DEMO@markethub.APP"));
        assert!(!seed.is_default_email("someone@else.com"));
    }
}
