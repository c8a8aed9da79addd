// Storage keys
pub const CHECKOUT_KEY_PREFIX: &str = "checkout:";
pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

// Fee policy defaults (reference deployment: 5% + ₦100 per paid ticket)
pub const DEFAULT_FEE_BPS: u32 = 500;
pub const DEFAULT_FLAT_FEE: u64 = 100;
pub const DEFAULT_CURRENCY: &str = "NGN";
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const MAX_FEE_BPS: u32 = 10_000; // 100% max

// Shown to the buyer only; nothing enforces it
pub const DEFAULT_RESERVATION_MINUTES: u32 = 15;

// Routes
pub const CHECKOUT_ROUTE_PREFIX: &str = "/checkout/";

// Environment variables
pub const ENV_FEE_BPS: &str = "BOXOFFICE_FEE_BPS";
pub const ENV_FLAT_FEE: &str = "BOXOFFICE_FLAT_FEE";
pub const ENV_CURRENCY: &str = "BOXOFFICE_CURRENCY";
pub const ENV_RESERVATION_MINUTES: &str = "BOXOFFICE_RESERVATION_MINUTES";
