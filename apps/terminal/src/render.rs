//! # Text View
//!
//! Renders a [`LookupState`] as the lines the kiosk shows. Building the
//! lines is pure; only [`draw`] touches the terminal.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use crossterm::{
    cursor::{MoveTo, MoveToNextLine},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use pricecheck_core::{Barcode, LookupState, ProductView};

pub const TITLE: &str = "CONSULTOR DE PRECIOS";
pub const PROMPT: &str = "Escanee un código de barras para ver los detalles del producto.";
pub const LOADING: &str = "Cargando...";
pub const LOOKUP_FAILED: &str = "Error al buscar el producto";
pub const NOT_FOUND: &str = "Producto no encontrado";
pub const NOT_FOUND_HINT: &str = "Por favor, intente escanear otro código de barras.";
pub const EXIT_HINT: &str = "Esc para salir";

/// Settings the view needs besides the state itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Base the photo identifier is appended to (the relay's image route).
    pub photo_base: String,
    /// Identifier shown when a product has no photo.
    pub placeholder: String,
}

impl RenderContext {
    fn photo_url(&self, identifier: &str) -> String {
        format!("{}/{}", self.photo_base.trim_end_matches('/'), identifier)
    }
}

/// Builds the screen for one state.
pub fn render_lines(
    state: &LookupState,
    last_barcode: Option<&Barcode>,
    ctx: &RenderContext,
    now: NaiveDateTime,
) -> Vec<String> {
    let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.len()), String::new()];

    match state {
        LookupState::Idle => lines.push(PROMPT.to_string()),
        LookupState::Loading => lines.push(LOADING.to_string()),
        LookupState::NotFound => {
            lines.push(NOT_FOUND.to_string());
            lines.push(NOT_FOUND_HINT.to_string());
        }
        LookupState::Error(message) => {
            lines.push(LOOKUP_FAILED.to_string());
            lines.push(message.clone());
        }
        LookupState::Found(record) => match ProductView::from_record(record, &ctx.placeholder) {
            Ok(view) => product_lines(&mut lines, &view, ctx, now),
            Err(e) => {
                lines.push(LOOKUP_FAILED.to_string());
                lines.push(e.to_string());
            }
        },
    }

    lines.push(String::new());
    if let Some(code) = last_barcode {
        lines.push(format!("Código escaneado: {}", code));
    }
    lines.push(EXIT_HINT.to_string());
    lines
}

fn product_lines(lines: &mut Vec<String>, view: &ProductView, ctx: &RenderContext, now: NaiveDateTime) {
    lines.push(view.name.clone());
    if let Some(code) = &view.code {
        lines.push(format!("Código: {}", code));
    }
    lines.push(String::new());
    lines.push(format!("Precio: {}", view.shelf_price));
    if let Some(cost) = view.cost {
        lines.push(format!("Costo: {}", cost));
    }
    if view.is_promotion_active(now) {
        lines.push("¡Producto en promoción!".to_string());
    }

    if let Some(description) = &view.description {
        lines.push(format!("Descripción: {}", description));
    }
    if let Some(packaging) = &view.packaging {
        lines.push(format!("Empaque: {}", packaging));
    }
    if let Some(stock) = view.stock {
        lines.push(format!("Stock: {}", stock));
    }

    lines.push(String::new());
    for tax in &view.taxes {
        lines.push(format!("{}: {}", tax.label, tax.display));
    }

    if !view.tiers.is_empty() {
        lines.push(String::new());
        for tier in &view.tiers {
            lines.push(format!("Precio {}: {}", tier.class, tier.price));
        }
    }

    lines.push(String::new());
    lines.push(format!("Foto: {}", ctx.photo_url(&view.photo)));
}

/// Clears the screen and writes `lines` from the top.
///
/// Uses explicit cursor moves so it works in raw mode, where `\n` doesn't
/// return the carriage.
pub fn draw<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for line in lines {
        queue!(out, Print(line), MoveToNextLine(1))?;
    }
    out.flush()
}
