use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{BookingStatus, ConfirmedBooking};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "psid, registration_number, vehicle_name, owner, city, area, \
     station_name, inspection_date, time_slot, amount, status, created_at, paid_at";

// ── Bookings ──

/// Inserts a submitted booking. Returns `false` when the PSID is already
/// in the ledger; the existing row is left untouched.
pub fn record_booking(conn: &Connection, booking: &ConfirmedBooking) -> anyhow::Result<bool> {
    let count = conn.execute(
        "INSERT OR IGNORE INTO bookings (psid, registration_number, vehicle_name, owner, city, area,
            station_name, inspection_date, time_slot, amount, status, created_at, paid_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            booking.psid,
            booking.registration_number,
            booking.vehicle_name,
            booking.owner,
            booking.city,
            booking.area,
            booking.station_name,
            booking.date.format("%Y-%m-%d").to_string(),
            booking.time_slot,
            booking.amount,
            booking.status.as_str(),
            booking.created_at.format(TS_FORMAT).to_string(),
            booking.paid_at.map(|t| t.format(TS_FORMAT).to_string()),
        ],
    )?;
    Ok(count > 0)
}

pub fn get_booking(conn: &Connection, psid: &str) -> anyhow::Result<Option<ConfirmedBooking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE psid = ?1");
    let row = conn
        .query_row(&sql, params![psid], |row| Ok(parse_booking_row(row)))
        .optional()?;
    row.transpose()
}

/// Newest first, optionally filtered by status.
pub fn list_bookings(
    conn: &Connection,
    status: Option<BookingStatus>,
    limit: i64,
) -> anyhow::Result<Vec<ConfirmedBooking>> {
    let mut bookings = vec![];
    match status {
        Some(status) => {
            let sql = format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1 \
                 ORDER BY created_at DESC, psid DESC LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![status.as_str(), limit], |row| {
                Ok(parse_booking_row(row))
            })?;
            for row in rows {
                bookings.push(row??);
            }
        }
        None => {
            let sql = format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, psid DESC LIMIT ?1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![limit], |row| Ok(parse_booking_row(row)))?;
            for row in rows {
                bookings.push(row??);
            }
        }
    }
    Ok(bookings)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentUpdate {
    Paid(ConfirmedBooking),
    AlreadyPaid(ConfirmedBooking),
    NotFound,
}

/// Moves a booking from pending to paid. Paying twice is not an error.
pub fn mark_paid(conn: &Connection, psid: &str) -> anyhow::Result<PaymentUpdate> {
    let now = Utc::now().naive_utc().format(TS_FORMAT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = 'paid', paid_at = ?1 WHERE psid = ?2 AND status = 'pending'",
        params![now, psid],
    )?;

    Ok(match (count, get_booking(conn, psid)?) {
        (_, None) => PaymentUpdate::NotFound,
        (0, Some(booking)) => PaymentUpdate::AlreadyPaid(booking),
        (_, Some(booking)) => PaymentUpdate::Paid(booking),
    })
}

pub fn count_by_status(conn: &Connection, status: BookingStatus) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE status = ?1",
        params![status.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<ConfirmedBooking> {
    let date_str: String = row.get(7)?;
    let status_str: String = row.get(10)?;
    let created_at_str: String = row.get(11)?;
    let paid_at_str: Option<String> = row.get(12)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown booking status: {status_str}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TS_FORMAT)?;
    let paid_at = paid_at_str
        .map(|s| NaiveDateTime::parse_from_str(&s, TS_FORMAT))
        .transpose()?;

    Ok(ConfirmedBooking {
        psid: row.get(0)?,
        registration_number: row.get(1)?,
        vehicle_name: row.get(2)?,
        owner: row.get(3)?,
        city: row.get(4)?,
        area: row.get(5)?,
        station_name: row.get(6)?,
        date,
        time_slot: row.get(8)?,
        amount: row.get(9)?,
        status,
        created_at,
        paid_at,
    })
}
