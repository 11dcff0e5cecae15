// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::Config;
use crate::error::BackendError;
use crate::models::{Collection, EntityKind, ParamItem, ParamKind, Side};

/// The REST collaborator. Every call is opaque: a full collection, or an error.
/// `Sync` so a batch of deletions can be in flight at once.
pub trait Backend: Sync {
    fn fetch(&self, kind: EntityKind) -> Result<Collection, BackendError>;
    fn fetch_params(&self, side: Side, param: ParamKind) -> Result<Vec<ParamItem>, BackendError>;
    fn create(&self, kind: EntityKind, body: &Value) -> Result<(), BackendError>;
    fn update(&self, kind: EntityKind, id: i64, body: &Value) -> Result<(), BackendError>;
    fn delete(&self, kind: EntityKind, id: i64) -> Result<(), BackendError>;
    fn patch_payment(
        &self,
        side: Side,
        id: i64,
        payment_date: Option<NaiveDate>,
    ) -> Result<(), BackendError>;
    fn create_param(&self, side: Side, param: ParamKind, name: &str) -> Result<(), BackendError>;
}

fn collection_path(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Income => "/api/receitas",
        EntityKind::Expense => "/api/despesas",
        EntityKind::Card => "/api/cartoes",
        EntityKind::CardTransaction => "/api/transacoes-cartao",
    }
}

fn param_path(side: Side, param: ParamKind) -> String {
    let side = match side {
        Side::Income => "receita",
        Side::Expense => "despesa",
    };
    let param = match param {
        ParamKind::Categories => "categorias",
        ParamKind::Accounts => "contas",
        ParamKind::PaymentMethods => "formas-pagamento",
    };
    format!("/api/{side}/{param}")
}

pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    pub fn new(cfg: &Config) -> Result<Self, BackendError> {
        Ok(Self {
            client: crate::utils::http_client(cfg.timeout_secs)?,
            base: cfg.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Non-2xx becomes `Status` with the body text; 204 yields `None`.
    fn send(&self, req: RequestBuilder) -> Result<Option<String>, BackendError> {
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(resp.text()?))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let body = self.send(self.client.get(&url))?.unwrap_or_default();
        Ok(serde_json::from_str(&body)?)
    }
}

impl Backend for HttpBackend {
    fn fetch(&self, kind: EntityKind) -> Result<Collection, BackendError> {
        let path = collection_path(kind);
        Ok(match kind {
            EntityKind::Income => Collection::Incomes(self.get_json(path)?),
            EntityKind::Expense => Collection::Expenses(self.get_json(path)?),
            EntityKind::Card => Collection::Cards(self.get_json(path)?),
            EntityKind::CardTransaction => Collection::CardTransactions(self.get_json(path)?),
        })
    }

    fn fetch_params(&self, side: Side, param: ParamKind) -> Result<Vec<ParamItem>, BackendError> {
        self.get_json(&param_path(side, param))
    }

    fn create(&self, kind: EntityKind, body: &Value) -> Result<(), BackendError> {
        let url = self.url(collection_path(kind));
        debug!(%url, "POST");
        self.send(self.client.post(url).json(body))?;
        Ok(())
    }

    fn update(&self, kind: EntityKind, id: i64, body: &Value) -> Result<(), BackendError> {
        let url = self.url(&format!("{}/{id}", collection_path(kind)));
        debug!(%url, "PUT");
        self.send(self.client.put(url).json(body))?;
        Ok(())
    }

    fn delete(&self, kind: EntityKind, id: i64) -> Result<(), BackendError> {
        let url = self.url(&format!("{}/{id}", collection_path(kind)));
        debug!(%url, "DELETE");
        self.send(self.client.delete(url))?;
        Ok(())
    }

    fn patch_payment(
        &self,
        side: Side,
        id: i64,
        payment_date: Option<NaiveDate>,
    ) -> Result<(), BackendError> {
        let url = self.url(&format!("{}/{id}/pagamento", collection_path(side.kind())));
        debug!(%url, "PATCH");
        self.send(
            self.client
                .patch(url)
                .json(&json!({ "payment_date": payment_date })),
        )?;
        Ok(())
    }

    fn create_param(&self, side: Side, param: ParamKind, name: &str) -> Result<(), BackendError> {
        let url = self.url(&param_path(side, param));
        debug!(%url, "POST");
        self.send(self.client.post(url).json(&json!({ "name": name })))?;
        Ok(())
    }
}
