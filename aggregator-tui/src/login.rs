//! Login gate shown before the dashboard starts polling.

const USERNAME: &str = "vika";
const PASSWORD: &str = "12345678";

pub fn verify(username: &str, password: &str) -> bool {
    username == USERNAME && password == PASSWORD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Username,
    Password,
}

/// Input state of the login screen.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub field: Field,
    pub error: Option<&'static str>,
}

impl LoginForm {
    pub fn type_char(&mut self, c: char) {
        self.error = None;
        match self.field {
            Field::Username => self.username.push(c),
            Field::Password => self.password.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            Field::Username => {
                self.username.pop();
            }
            Field::Password => {
                self.password.pop();
            }
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
    }

    /// Check the entered credentials. On failure the password is cleared
    /// and an error message is set for the next render.
    pub fn submit(&mut self) -> bool {
        if verify(&self.username, &self.password) {
            return true;
        }
        self.password.clear();
        self.field = Field::Password;
        self.error = Some("Invalid username or password");
        false
    }
}
