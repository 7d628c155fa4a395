//! Validation rules of the sign-in and sign-up forms.

pub const USERNAME_REQUIRED: &str = "请输入帐号";
pub const PASSWORD_REQUIRED: &str = "请输入密码";
pub const CONFIRM_REQUIRED: &str = "请再次输入密码";
pub const LENGTH_MESSAGE: &str = "长度要大于 6 小于 30";
pub const MISMATCH_MESSAGE: &str = "两次密码输入不一致";

const MIN_EXCLUSIVE: usize = 6;
const MAX_EXCLUSIVE: usize = 30;

/// Form event that runs a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Input,
    Blur,
    /// The password field changed; re-checks the confirmation.
    PasswordInput,
}

/// What a rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Required,
    /// Character count strictly between 6 and 30.
    Length,
    /// Equals the password field.
    MatchesPassword,
}

/// One rule of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub message: &'static str,
    pub check: Check,
    pub triggers: &'static [Trigger],
}

impl Rule {
    /// Whether `value` passes, given the current `password` field.
    #[must_use]
    pub fn passes(&self, value: &str, password: &str) -> bool {
        match self.check {
            Check::Required => !value.is_empty(),
            Check::Length => {
                let len = value.chars().count();
                len > MIN_EXCLUSIVE && len < MAX_EXCLUSIVE
            }
            Check::MatchesPassword => value == password,
        }
    }
}

#[must_use]
pub const fn create_username_rule() -> [Rule; 2] {
    [
        Rule {
            message: USERNAME_REQUIRED,
            check: Check::Required,
            triggers: &[Trigger::Blur],
        },
        Rule {
            message: LENGTH_MESSAGE,
            check: Check::Length,
            triggers: &[Trigger::Blur],
        },
    ]
}

#[must_use]
pub const fn create_password_rule() -> [Rule; 2] {
    [
        Rule {
            message: PASSWORD_REQUIRED,
            check: Check::Required,
            triggers: &[Trigger::Blur],
        },
        Rule {
            message: LENGTH_MESSAGE,
            check: Check::Length,
            triggers: &[Trigger::Blur],
        },
    ]
}

#[must_use]
pub const fn create_confirm_password_rule() -> [Rule; 2] {
    [
        Rule {
            message: CONFIRM_REQUIRED,
            check: Check::Required,
            triggers: &[Trigger::Input, Trigger::Blur],
        },
        Rule {
            message: MISMATCH_MESSAGE,
            check: Check::MatchesPassword,
            triggers: &[Trigger::Blur, Trigger::PasswordInput],
        },
    ]
}

/// Runs every rule and returns the first failing message.
///
/// # Errors
///
/// Returns the message of the first rule `value` fails.
pub fn validate(rules: &[Rule], value: &str, password: &str) -> Result<(), &'static str> {
    rules
        .iter()
        .find(|rule| !rule.passes(value, password))
        .map_or(Ok(()), |rule| Err(rule.message))
}

/// Like [`validate`], limited to the rules fired by `trigger`.
///
/// # Errors
///
/// Returns the message of the first fired rule `value` fails.
pub fn validate_on(
    rules: &[Rule],
    trigger: Trigger,
    value: &str,
    password: &str,
) -> Result<(), &'static str> {
    rules
        .iter()
        .filter(|rule| rule.triggers.contains(&trigger))
        .find(|rule| !rule.passes(value, password))
        .map_or(Ok(()), |rule| Err(rule.message))
}
