//! Address-to-eligibility resolution pipeline
//!
//! Four lookups against the ARCEP directory, each feeding the next:
//! 1. Town search → first `Town`
//! 2. Address search scoped to the town → first `Address`
//! 3. Building fetch → `Building` with a non-empty address code
//! 4. Fixed-line eligibility fetch by address code → raw payload
//!
//! The first failing stage aborts the run; nothing after it is called.
use crate::directory_client::DirectoryApi;
use crate::errors::{AppError, ResultExt};
use crate::models::{Address, Building, BuildingRecord, Town};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

pub const TOWNS_PATH: &str = "/adresses/communes";
pub const ADDRESSES_PATH: &str = "/adresses/adresses";
pub const BUILDING_PATH: &str = "/immeubles/immeuble";
pub const FIXED_ELIGIBILITY_PATH: &str = "/eligibilites/fixe";

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingTown,
    ResolvingAddress,
    ResolvingBuilding,
    FetchingEligibility,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingTown => "resolving town",
            Stage::ResolvingAddress => "resolving address",
            Stage::ResolvingBuilding => "resolving building",
            Stage::FetchingEligibility => "fetching eligibility",
        };
        f.write_str(name)
    }
}

/// Decodes index zero of the remote ordering, or `None` for an empty sequence.
///
/// Later candidates are never inspected, so a malformed one cannot fail the lookup.
fn first_of<T: DeserializeOwned>(data: Value, what: &str) -> Result<Option<T>, AppError> {
    let candidates: Vec<Value> =
        serde_json::from_value(data).with_context(|| format!("decoding {} search", what))?;
    tracing::debug!("{} search returned {} candidate(s)", what, candidates.len());

    match candidates.into_iter().next() {
        Some(first) => Ok(Some(
            serde_json::from_value(first).with_context(|| format!("decoding first {}", what))?,
        )),
        None => Ok(None),
    }
}

/// Resolve a free-text town name to the first matching `Town`.
pub async fn get_town<C: DirectoryApi>(client: &C, town_name: &str) -> Result<Town, AppError> {
    let data = client
        .get_json(TOWNS_PATH, &[("search", town_name)])
        .await?;
    first_of::<Town>(data, "town")?.ok_or_else(|| AppError::town_not_found(town_name))
}

/// Resolve a street address within `town_id` to the first matching `Address`.
pub async fn get_address<C: DirectoryApi>(
    client: &C,
    street_address: &str,
    town_id: i64,
) -> Result<Address, AppError> {
    let comid = town_id.to_string();
    let data = client
        .get_json(
            ADDRESSES_PATH,
            &[("search", street_address), ("comid", comid.as_str())],
        )
        .await?;
    first_of::<Address>(data, "address")?
        .ok_or_else(|| AppError::address_not_found(street_address))
}

/// Fetch the building record for `building_id`.
///
/// A record without an address code is a failure even though the call succeeded.
pub async fn get_building<C: DirectoryApi>(
    client: &C,
    building_id: i64,
) -> Result<Building, AppError> {
    let immeubleid = building_id.to_string();
    let data = client
        .get_json(BUILDING_PATH, &[("immeubleid", immeubleid.as_str())])
        .await?;
    let record: BuildingRecord = serde_json::from_value(data).context("decoding building")?;

    record
        .into_building()
        .ok_or_else(|| AppError::address_code_not_found(building_id))
}

/// Fetch the fixed-line eligibility payload for an address code, untouched.
pub async fn get_fixed_line_eligibilities<C: DirectoryApi>(
    client: &C,
    address_code: &str,
) -> Result<Value, AppError> {
    client
        .get_json(FIXED_ELIGIBILITY_PATH, &[("codeadr", address_code)])
        .await
}

/// Run the four stages and pretty-print the eligibility payload.
pub async fn get_fixed_line_eligibilities_by_address<C: DirectoryApi>(
    client: &C,
    street_address: &str,
    town_name: &str,
) -> Result<String, AppError> {
    let eligibilities = resolve_eligibilities(client, street_address, town_name).await?;
    Ok(serde_json::to_string_pretty(&eligibilities)?)
}

/// Run the four stages and return the raw eligibility payload.
pub async fn resolve_eligibilities<C: DirectoryApi>(
    client: &C,
    street_address: &str,
    town_name: &str,
) -> Result<Value, AppError> {
    tracing::info!(
        "Resolving fixed-line eligibilities for '{}', '{}'",
        street_address,
        town_name
    );

    let town = run_stage(Stage::ResolvingTown, get_town(client, town_name)).await?;
    tracing::info!(
        "✓ Town: {} (comid {}, INSEE {})",
        town.nom.as_deref().unwrap_or("?"),
        town.comid,
        town.code_insee.as_deref().unwrap_or("?")
    );

    let address = run_stage(
        Stage::ResolvingAddress,
        get_address(client, street_address, town.comid),
    )
    .await?;
    tracing::info!(
        "✓ Address: {} (immeubleid {})",
        address.nom.as_deref().unwrap_or("?"),
        address.immeubleid
    );

    let building = run_stage(
        Stage::ResolvingBuilding,
        get_building(client, address.immeubleid),
    )
    .await?;
    tracing::info!(
        "✓ Building: code_adr {} ({:?}, {:?})",
        building.code_adr,
        building.longitude,
        building.latitude
    );

    run_stage(
        Stage::FetchingEligibility,
        get_fixed_line_eligibilities(client, &building.code_adr),
    )
    .await
}

/// Logs the stage outcome; the error itself passes through unchanged.
async fn run_stage<T, F>(stage: Stage, fut: F) -> Result<T, AppError>
where
    F: std::future::Future<Output = Result<T, AppError>>,
{
    tracing::debug!("Pipeline stage: {}", stage);
    let result = fut.await;
    if let Err(ref e) = result {
        match e.root() {
            AppError::NotFound { .. } => tracing::warn!("Failed while {}: {}", stage, e),
            _ => tracing::error!("Failed while {}: {}", stage, e),
        }
    }
    result
}
