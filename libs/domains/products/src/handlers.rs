use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath, JsonBody, QueryParams,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::mapper::{to_dto, to_model};
use crate::models::{ProductRequestDto, ProductResponseDto};
use crate::pagination::{PageQuery, PriceRangeQuery};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI tag shared by every product endpoint
pub const TAG: &str = "products";

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        list_products_by_price,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(ProductRequestDto, ProductResponseDto),
        responses(BadRequestResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/by-price", get(list_products_by_price))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List one page of products
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Requested page of products", body = Vec<ProductResponseDto>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ProductResult<Json<Vec<ProductResponseDto>>> {
    let products = service.find_all(&query.into()).await?;
    Ok(Json(products.into_iter().map(to_dto).collect()))
}

/// List one page of products priced within an inclusive range
#[utoipa::path(
    get,
    path = "/by-price",
    tag = TAG,
    params(PriceRangeQuery),
    responses(
        (
            status = 200,
            description = "Requested page of products in the price range",
            body = Vec<ProductResponseDto>
        ),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products_by_price<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    QueryParams(query): QueryParams<PriceRangeQuery>,
) -> ProductResult<Json<Vec<ProductResponseDto>>> {
    let (from, to, page) = query.into_parts();
    let products = service.find_all_by_price_between(from, to, &page).await?;
    Ok(Json(products.into_iter().map(to_dto).collect()))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = ProductRequestDto,
    responses(
        (status = 201, description = "Product created", body = ProductResponseDto),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(input): JsonBody<ProductRequestDto>,
) -> ProductResult<impl IntoResponse> {
    let product = service.save(to_model(input)).await?;
    Ok((StatusCode::CREATED, Json(to_dto(product))))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponseDto),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductResponseDto>> {
    let product = service.get(id).await?;
    Ok(Json(to_dto(product)))
}

/// Replace name and price of a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductRequestDto,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<ProductRequestDto>,
) -> ProductResult<StatusCode> {
    service.update(to_model(input).with_id(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<StatusCode> {
    service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
