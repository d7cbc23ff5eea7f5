pub mod character_service;
pub mod health;
pub mod setting_service;
pub mod user_service;

// 健康检查与状态
pub use health::{api_status, health_check, liveness, readiness};

// 用户服务
pub use user_service::{
    character_count as user_character_count, get_profile as user_get_profile, login, register,
    setting_count as user_setting_count,
};

// 角色服务
pub use character_service::{
    create as character_create, delete as character_delete, get as character_get,
    list as character_list, update as character_update,
};

// 设定服务
pub use setting_service::{
    create as setting_create, delete as setting_delete, get as setting_get, list as setting_list,
    update as setting_update,
};
