//! Fixed strings shown to the user

pub const CMD_EXECUTION_SUCCESS: &str = "Command execution successful.";
pub const CMD_EXECUTION_FAILED: &str = "Command execution failed.";
pub const CMD_UNDEFINED: &str = "Command is not defined.";
pub const USER_SIGNIN_FAILED: &str = "Sign-in failed.";
pub const SIGN_IN_REQUIRED: &str = "You need to sign in first.";
pub const ALREADY_SIGNED_IN: &str = "You are already signed in, sign out first.";
pub const ANONYMOUS_CUSTOMER: &str = "ANONYMOUS";
pub const ERROR_PREFIX: &str = "ERROR: ";
