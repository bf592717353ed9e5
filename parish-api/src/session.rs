#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
}

/// Session as handed over by the auth provider. Never modified here.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn guest() -> Session {
        Session { user: None }
    }

    pub fn member(name: impl Into<String>, email: impl Into<String>) -> Session {
        Session {
            user: Some(SessionUser {
                name: name.into(),
                email: email.into(),
            }),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.user.is_none()
    }
}
