//! Profile commands.

use std::io::Write;

use chrono::Utc;
use levelup_core::UserId;
use levelup_storefront::profile::ProfileInput;
use levelup_storefront::state::AppState;

use super::CommandError;

/// Print the stored profile.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn show(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let Some(profile) = state.profiles().load()? else {
        writeln!(out, "No hay un perfil guardado")?;
        return Ok(());
    };

    let today = Utc::now().date_naive();
    writeln!(out, "ID:        {}", profile.id)?;
    writeln!(out, "Nombre:    {}", profile.nombre)?;
    writeln!(out, "Correo:    {}", profile.email)?;
    writeln!(
        out,
        "Nacimiento: {} ({} años)",
        profile.fecha_nacimiento,
        profile.age_on(today)
    )?;
    writeln!(
        out,
        "DUOC:      {}",
        if profile.is_duoc { "sí" } else { "no" }
    )?;
    if let Some(code) = &profile.referral_code {
        writeln!(out, "Referido:  {code}")?;
    }
    Ok(())
}

/// Validate and store a profile.
///
/// # Errors
///
/// Returns an error if validation or the store fails.
pub fn set(
    state: &AppState,
    id: i32,
    input: ProfileInput,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let profile = input.validate(UserId::new(id), Utc::now().date_naive())?;
    state.profiles().save(&profile)?;
    writeln!(out, "Perfil guardado para {}", profile.nombre)?;
    if profile.is_duoc {
        writeln!(
            out,
            "Correo DUOC verificado: {}% de descuento en tus compras",
            state.engine().duoc_percent()
        )?;
    }
    Ok(())
}

/// Delete the stored profile.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn clear(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    state.profiles().clear()?;
    writeln!(out, "Perfil eliminado")?;
    Ok(())
}
