mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_activate_term, handle_create, handle_dashboard, handle_delete, handle_get, handle_list,
    handle_resources, handle_respond, handle_responses, handle_route, handle_slug, handle_toggle,
    handle_update,
};
