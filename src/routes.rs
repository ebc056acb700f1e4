use actix_web::{delete, get, post, put, web, HttpResponse};
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::{FindOptions, ReplaceOptions};
use mongodb::{Client, Collection};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::balance::{amount_owed_by, compute_net_balances};
use crate::error::ApiError;
use crate::roster;
use crate::schemas::{BillState, Payer, SlipRecord};
use crate::settlement::{
    compute_transfers, is_settling_transfer, matches_confirmed_slip, resolve_instructions,
};

const DATABASE: &str = "GoDutch";

fn states(client: &Client) -> Collection<BillState> {
    client.database(DATABASE).collection("State")
}

fn slips(client: &Client) -> Collection<SlipRecord> {
    client.database(DATABASE).collection("Slips")
}

// The whole bill lives in one shared document, so readers always see a
// complete snapshot.
async fn current_state(client: &Client) -> Result<BillState, ApiError> {
    Ok(states(client).find_one(None, None).await?.unwrap_or_default())
}

async fn persist_state(client: &Client, state: &BillState) -> Result<(), ApiError> {
    states(client)
        .replace_one(doc! {}, state, ReplaceOptions::builder().upsert(true).build())
        .await?;
    Ok(())
}

#[get("/api/state/load")]
async fn load_state(client: web::Data<Client>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(current_state(&client).await?))
}

#[post("/api/state/save")]
async fn save_state(
    client: web::Data<Client>,
    json: web::Json<BillState>,
) -> Result<HttpResponse, ApiError> {
    let state = roster::normalized(json.into_inner());
    persist_state(&client, &state).await?;
    info!(payers = state.payers.len(), items = state.items.len(), "state saved");
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

#[derive(Deserialize)]
struct NewPayerJson {
    name: String,
    bank_account: Option<String>,
    promptpay: Option<String>,
}

#[post("/api/state/payers")]
async fn add_payer(
    client: web::Data<Client>,
    json: web::Json<NewPayerJson>,
) -> Result<HttpResponse, ApiError> {
    let json = json.into_inner();
    let payer = Payer {
        id: Uuid::new_v4(),
        name: json.name,
        bank_account: json.bank_account,
        promptpay: json.promptpay,
    };
    let state = roster::with_payer(current_state(&client).await?, payer);
    persist_state(&client, &state).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[derive(Deserialize)]
struct RenameJson {
    name: String,
}

#[put("/api/state/payers/{id}")]
async fn rename_payer(
    client: web::Data<Client>,
    id: web::Path<Uuid>,
    json: web::Json<RenameJson>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let state = current_state(&client).await?;
    if !state.payers.iter().any(|payer| payer.id == id) {
        return Err(ApiError::NotFound(format!("no payer with id {id}")));
    }
    let state = roster::renamed_payer(state, id, json.into_inner().name);
    persist_state(&client, &state).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[delete("/api/state/payers/{id}")]
async fn remove_payer(
    client: web::Data<Client>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let state = roster::without_payer(current_state(&client).await?, id.into_inner());
    persist_state(&client, &state).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[derive(Deserialize)]
struct NewItemJson {
    name: String,
    price: f64,
}

#[post("/api/state/items")]
async fn add_item(
    client: web::Data<Client>,
    json: web::Json<NewItemJson>,
) -> Result<HttpResponse, ApiError> {
    let json = json.into_inner();
    let state = roster::with_item(current_state(&client).await?, json.name, json.price);
    persist_state(&client, &state).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[delete("/api/state/items/{index}")]
async fn remove_item(
    client: web::Data<Client>,
    index: web::Path<usize>,
) -> Result<HttpResponse, ApiError> {
    let state = roster::without_item(current_state(&client).await?, index.into_inner());
    persist_state(&client, &state).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[get("/api/balance")]
async fn get_balance(client: web::Data<Client>) -> Result<HttpResponse, ApiError> {
    let state = current_state(&client).await?;
    let net = compute_net_balances(&state.payers, &state.items);
    let balances: Vec<_> = state
        .payers
        .iter()
        .map(|payer| {
            json!({
                "id": payer.id,
                "name": payer.name,
                "amount": net.get(&payer.id).copied().unwrap_or(0.0),
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(balances))
}

#[get("/api/payers/{id}/owed")]
async fn get_owed(
    client: web::Data<Client>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let state = current_state(&client).await?;
    if !state.payers.iter().any(|payer| payer.id == id) {
        return Err(ApiError::NotFound(format!("no payer with id {id}")));
    }
    Ok(HttpResponse::Ok().json(json!({ "amount": amount_owed_by(id, &state.items) })))
}

#[get("/api/transfers")]
async fn get_transfers(client: web::Data<Client>) -> Result<HttpResponse, ApiError> {
    let state = current_state(&client).await?;
    let net = compute_net_balances(&state.payers, &state.items);
    let plan = resolve_instructions(&compute_transfers(&net), &state.payers);
    Ok(HttpResponse::Ok().json(plan))
}

// Extraction happens in the external slip service; we only archive the
// structured results it hands over.
#[post("/api/slip/records")]
async fn add_slip_records(
    client: web::Data<Client>,
    json: web::Json<Vec<SlipRecord>>,
) -> Result<HttpResponse, ApiError> {
    let records = json.into_inner();
    if !records.is_empty() {
        slips(&client).insert_many(&records, None).await?;
    }
    Ok(HttpResponse::Ok().json(json!({ "results": records })))
}

#[get("/api/slip/history")]
async fn get_slip_history(client: web::Data<Client>) -> Result<HttpResponse, ApiError> {
    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .limit(20)
        .build();
    let records: Vec<SlipRecord> = slips(&client).find(None, options).await?.try_collect().await?;
    Ok(HttpResponse::Ok().json(records))
}

#[derive(Deserialize)]
struct VerifySlipJson {
    from: String,
    to: String,
    amount: f64,
}

#[post("/api/slip/verify")]
async fn verify_slip(
    client: web::Data<Client>,
    json: web::Json<VerifySlipJson>,
) -> Result<HttpResponse, ApiError> {
    let json = json.into_inner();
    let from = json.from.trim();
    let to = json.to.trim();

    let state = current_state(&client).await?;
    let net = compute_net_balances(&state.payers, &state.items);
    let plan = resolve_instructions(&compute_transfers(&net), &state.payers);
    let planned = is_settling_transfer(&plan, from, to, json.amount);

    let history: Vec<SlipRecord> = slips(&client).find(None, None).await?.try_collect().await?;
    let confirmed = matches_confirmed_slip(&history, from, to, json.amount);

    info!(from, to, amount = json.amount, planned, confirmed, "slip checked");
    Ok(HttpResponse::Ok().json(json!({ "planned": planned, "confirmed": confirmed })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(load_state)
        .service(save_state)
        .service(add_payer)
        .service(rename_payer)
        .service(remove_payer)
        .service(add_item)
        .service(remove_item)
        .service(get_balance)
        .service(get_owed)
        .service(get_transfers)
        .service(add_slip_records)
        .service(get_slip_history)
        .service(verify_slip);
}
