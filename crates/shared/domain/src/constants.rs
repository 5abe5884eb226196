//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Role of an account whose email address is not confirmed yet
pub const ROLE_NON_USER: &str = "NON_USER";

/// Role granted once the email address is confirmed
pub const ROLE_USER: &str = "USER";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum nickname length
pub const MAX_NICKNAME_LENGTH: usize = 20;

/// Maximum self-introduction length
pub const MAX_INTRODUCTION_LENGTH: usize = 500;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Verification
// =============================================================================

/// Hours a verification code stays usable after it was issued
pub const VERIFICATION_CODE_TTL_HOURS: i64 = 24;

// =============================================================================
// Accompany
// =============================================================================

/// Maximum number of tags on a single accompany post
pub const MAX_ACCOMPANY_TAGS: usize = 10;

/// Maximum length of a single tag
pub const MAX_TAG_LENGTH: usize = 20;

/// Deepest reply nesting level (0 = root reply)
pub const MAX_REPLY_DEPTH: i32 = 1;
