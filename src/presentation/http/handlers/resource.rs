//! Resource Handlers
//!
//! Request handling shared by every entity resource. The per-entity
//! handler modules extract the request and delegate here.

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::dto::ResourceDto;
use crate::application::services::CrudService;
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest, Sort, DEFAULT_PAGE_SIZE};
use crate::shared::validation::validation_error;

/// Total number of rows behind a paged listing.
pub static X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

/// Name and base path of an entity resource.
#[derive(Debug, Clone, Copy)]
pub struct Resource {
    pub entity: &'static str,
    pub path: &'static str,
}

/// `?page=0&size=20&sort=prop,desc&sort=other`
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    #[serde(default)]
    pub sort: Vec<String>,
}

impl PageParams {
    pub fn to_page_request(&self) -> Result<PageRequest, AppError> {
        let mut request = PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        for raw in &self.sort {
            let sort = Sort::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid sort parameter: {raw}")))?;
            request = request.with_sort(sort);
        }
        Ok(request)
    }
}

/// `?filter=<relation>-is-null`
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub filter: Option<String>,
}

/// `?query=...`, optionally paged.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub page: Option<u32>,
    pub size: Option<u32>,
    #[serde(default)]
    pub sort: Vec<String>,
}

impl SearchParams {
    pub fn to_page_request(&self) -> Result<PageRequest, AppError> {
        PageParams {
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
        .to_page_request()
    }
}

/// `X-Total-Count` and RFC 5988 `Link` headers for a page.
pub fn pagination_headers<T>(path: &str, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(X_TOTAL_COUNT.clone(), HeaderValue::from(page.total_elements));

    let link = |number: u64, rel: &str| {
        format!("<{path}?page={number}&size={}>; rel=\"{rel}\"", page.size)
    };
    let number = u64::from(page.number);
    let last = page.total_pages().saturating_sub(1);

    let mut links = Vec::with_capacity(4);
    if number < last {
        links.push(link(number + 1, "next"));
    }
    if number > 0 {
        links.push(link(number - 1, "prev"));
    }
    links.push(link(last, "last"));
    links.push(link(0, "first"));

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(header::LINK, value);
    }
    headers
}

/// Paged response: headers plus the page content as a JSON array.
pub fn paged_response<T: Serialize>(path: &str, page: Page<T>) -> Response {
    let headers = pagination_headers(path, &page);
    (headers, Json(page.content)).into_response()
}

pub async fn create<D, S>(service: &S, resource: Resource, dto: D) -> Result<Response, AppError>
where
    D: ResourceDto,
    S: CrudService<D> + ?Sized,
{
    dto.validate().map_err(validation_error)?;
    if dto.id().is_some() {
        return Err(AppError::BadRequest(format!(
            "A new {} cannot already have an ID",
            resource.entity
        )));
    }

    let saved = service.save(dto).await?;
    let location = saved
        .id()
        .map(|id| format!("{}/{}", resource.path, id))
        .unwrap_or_else(|| resource.path.to_string());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(saved),
    )
        .into_response())
}

fn check_path_id<D: ResourceDto>(path_id: i64, dto: &D) -> Result<(), AppError> {
    match dto.id() {
        None => Err(AppError::BadRequest("Invalid id: id is null".into())),
        Some(id) if id != path_id => Err(AppError::BadRequest(
            "Invalid ID: body id does not match path id".into(),
        )),
        Some(_) => Ok(()),
    }
}

pub async fn update<D, S>(service: &S, path_id: i64, dto: D) -> Result<Json<D>, AppError>
where
    D: ResourceDto,
    S: CrudService<D> + ?Sized,
{
    dto.validate().map_err(validation_error)?;
    check_path_id(path_id, &dto)?;
    Ok(Json(service.update(dto).await?))
}

pub async fn partial_update<D, S>(
    service: &S,
    resource: Resource,
    path_id: i64,
    dto: D,
) -> Result<Json<D>, AppError>
where
    D: ResourceDto,
    S: CrudService<D> + ?Sized,
{
    dto.validate().map_err(validation_error)?;
    check_path_id(path_id, &dto)?;
    service
        .partial_update(dto)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", resource.entity, path_id)))
}

pub async fn find_one<D, S>(service: &S, resource: Resource, id: i64) -> Result<Json<D>, AppError>
where
    D: ResourceDto,
    S: CrudService<D> + ?Sized,
{
    service
        .find_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", resource.entity, id)))
}
