mod auth;
mod export;
mod food;
mod helpers;
mod log;
mod photo;
mod profile;
mod summary;
mod weight;

pub(crate) use auth::{cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub(crate) use export::cmd_export;
pub(crate) use food::{
    cmd_food_add, cmd_food_favorite, cmd_food_favorites, cmd_food_list, cmd_food_search,
    cmd_recipes,
};
pub(crate) use log::{cmd_delete, cmd_log, cmd_recent};
pub(crate) use photo::cmd_photo;
pub(crate) use profile::{cmd_profile_set, cmd_profile_show, cmd_targets};
pub(crate) use summary::{cmd_summary, cmd_week};
pub(crate) use weight::{cmd_weight_history, cmd_weight_log};
