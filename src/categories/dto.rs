use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameCategoryRequest {
    pub new_name: Option<String>,
}
