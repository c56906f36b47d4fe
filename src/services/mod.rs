pub mod cache_service;
pub mod chart_service;
pub mod normalize_service;
pub mod page_service;
pub mod price_service;
pub mod table_service;
pub mod view_service;
