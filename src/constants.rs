// Session cookie
pub const SESSION_COOKIE: &str = "session";
pub const ONE_WEEK: u64 = 60 * 60 * 24 * 7;

// Routes reachable without a session
pub const PUBLIC_ROUTES: [&str; 2] = ["/register", "/login"];
pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LANDING: &str = "/participants";
pub const USER_LANDING: &str = "/dashboard";

// Inventory rules
pub const DEFAULT_MAX_CAPACITY_PER_SLOT: i32 = 50;
pub const SEED_FCD_BALANCE: i64 = 100_000;
pub const SEED_SLOT_COUNT: i32 = 1;
pub const SEED_CAPACITY: i32 = 0;

// Messages
pub const MESSAGE_REGISTERED: &str = "You have successfully registered! You may now login.";
pub const MESSAGE_LOGGED_IN: &str = "You have successfully logged in.";
pub const MESSAGE_LOGGED_OUT: &str = "You have successfully been logged out.";
pub const MESSAGE_INTERNAL: &str = "Internal server error";
