pub mod auth_handler;

pub use auth_handler::{
    __path_login, __path_logout, __path_me, __path_register, login, logout, me, register,
};
