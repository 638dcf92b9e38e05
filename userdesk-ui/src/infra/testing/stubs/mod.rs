mod user_admin;

pub use user_admin::StubUserAdminService;
