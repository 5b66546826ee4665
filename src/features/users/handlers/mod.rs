pub mod onboarding_handler;
