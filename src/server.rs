use crate::dispatcher::Dispatcher;
use crate::error::ResolveError;
use crate::resolver::{
    Apr, CirculatingSupply, ExistingDelegations, Resolver, TotalSupply, ValidatorList, Zones,
};
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

async fn respond(
    dispatcher: &Dispatcher,
    resolver: &dyn Resolver,
) -> Result<HttpResponse, ResolveError> {
    let data = dispatcher.serve(resolver).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(data))
}

/// Logs a rejected path parameter under the resolver that would have served it.
fn rejected(resolver: &'static str) -> impl FnOnce(ResolveError) -> ResolveError {
    move |err| {
        tracing::warn!("{}: {}", resolver, err);
        err
    }
}

#[actix_web::get("/")]
async fn banner() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body(format!(
        "Quicksilver (evince): {}\n",
        env!("CARGO_PKG_VERSION")
    ))
}

#[actix_web::get("/validatorList/{chain_id}")]
async fn validator_list(
    path: web::Path<(String,)>,
    data: web::Data<Dispatcher>,
) -> Result<HttpResponse, ResolveError> {
    let (chain_id,) = path.into_inner();
    let resolver = ValidatorList::new(chain_id).map_err(rejected("getValidatorList"))?;
    respond(&data, &resolver).await
}

#[actix_web::get("/existingDelegations/{chain_id}/{address}")]
async fn existing_delegations(
    path: web::Path<(String, String)>,
    data: web::Data<Dispatcher>,
) -> Result<HttpResponse, ResolveError> {
    let (chain_id, address) = path.into_inner();
    let resolver =
        ExistingDelegations::new(chain_id, address).map_err(rejected("getExistingDelegations"))?;
    respond(&data, &resolver).await
}

#[actix_web::get("/zones")]
async fn zones(data: web::Data<Dispatcher>) -> Result<HttpResponse, ResolveError> {
    respond(&data, &Zones).await
}

#[actix_web::get("/apr")]
async fn apr(data: web::Data<Dispatcher>) -> Result<HttpResponse, ResolveError> {
    respond(&data, &Apr).await
}

#[actix_web::get("/total_supply")]
async fn total_supply(data: web::Data<Dispatcher>) -> Result<HttpResponse, ResolveError> {
    respond(&data, &TotalSupply).await
}

#[actix_web::get("/circulating_supply")]
async fn circulating_supply(data: web::Data<Dispatcher>) -> Result<HttpResponse, ResolveError> {
    respond(&data, &CirculatingSupply).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(banner)
        .service(validator_list)
        .service(existing_delegations)
        .service(zones)
        .service(apr)
        .service(total_supply)
        .service(circulating_supply);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_passes_the_error_through() {
        let err = rejected("getExistingDelegations")(ResolveError::InvalidParameter {
            name: "address",
            value: "b.c".to_string(),
        });
        assert!(matches!(
            err,
            ResolveError::InvalidParameter { name: "address", .. }
        ));
    }
}
