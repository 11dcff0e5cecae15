// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::filter::Filterable;
use crate::models::{Card, CardTransaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardUsage {
    pub card_id: i64,
    pub name: String,
    pub limit: Decimal,
    pub spend: Decimal,
    pub available: Decimal,
}

/// Spend vs limit per card, in the order the cards were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardRollup {
    cards: Vec<CardUsage>,
}

impl CardRollup {
    pub fn get(&self, card_id: i64) -> Option<&CardUsage> {
        self.cards.iter().find(|c| c.card_id == card_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardUsage> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total_spend(&self) -> Decimal {
        self.cards.iter().map(|c| c.spend).sum()
    }
}

pub fn rollup(cards: &[Card], transactions: &[CardTransaction]) -> CardRollup {
    let mut spend: HashMap<i64, Decimal> = cards.iter().map(|c| (c.id, Decimal::ZERO)).collect();
    for trx in transactions {
        // dangling card references contribute nothing
        if let Some(slot) = spend.get_mut(&trx.credit_card_id) {
            *slot += trx.spend_amount();
        }
    }
    let cards = cards
        .iter()
        .map(|card| {
            let spent = spend.get(&card.id).copied().unwrap_or(Decimal::ZERO);
            let limit = card.limit();
            CardUsage {
                card_id: card.id,
                name: card.display_name(),
                limit,
                spend: spent,
                available: (limit - spent).max(Decimal::ZERO),
            }
        })
        .collect();
    CardRollup { cards }
}

/// A card transaction with its card's name resolved for display and filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardTransactionRow {
    #[serde(flatten)]
    pub transaction: CardTransaction,
    pub cartao: Option<String>,
}

impl CardTransactionRow {
    pub fn resolve(transaction: &CardTransaction, cards: &[Card]) -> Self {
        let cartao = cards
            .iter()
            .find(|c| c.id == transaction.credit_card_id)
            .and_then(|c| c.name.clone());
        Self {
            transaction: transaction.clone(),
            cartao,
        }
    }

    /// Card name, or `#<id>` when the card is gone.
    pub fn card_label(&self) -> String {
        self.cartao
            .clone()
            .unwrap_or_else(|| format!("#{}", self.transaction.credit_card_id))
    }
}

impl Filterable for CardTransactionRow {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "cartao" => self.cartao.clone(),
            _ => self.transaction.field(name),
        }
    }
}

/// Mapper for the card-transactions table: injects `cartao`.
pub fn with_card_names(cards: &[Card]) -> impl Fn(&CardTransaction) -> CardTransactionRow + '_ {
    move |trx: &CardTransaction| CardTransactionRow::resolve(trx, cards)
}
