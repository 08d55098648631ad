//! [`Database`] implementations.

#![allow(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]
#![allow(clippy::too_many_lines, reason = "SQL-related code a bit verbose")]

mod booking;
mod customer;
mod favorite;
mod hotel;
mod review;
mod room;

use async_trait::async_trait;
use common::operations::{Commit, Transact};
use refinery_core::{
    traits::r#async::{AsyncQuery, AsyncTransaction},
    AsyncMigrate, Migration,
};
use tracerr::Traced;

use crate::infra::{database, postgres, Database};

use super::{NonTx, Postgres, Tx};

/// Columns of a [`Hotel`] aliased with the `h_` prefix, expecting `hotels`
/// table to be aliased as `h`.
///
/// [`Hotel`]: crate::domain::Hotel
macro_rules! hotel_columns {
    () => {
        "h.id AS h_id, h.name AS h_name, h.star_rating AS h_star_rating, \
         h.description AS h_description, \
         h.phone AS h_phone, h.email AS h_email, \
         h.image_url AS h_image_url, h.street AS h_street, \
         h.city_id AS h_city_id, h.created_at AS h_created_at"
    };
}

/// Columns of a [`City`] aliased with the `c_` prefix, expecting `cities`
/// table to be aliased as `c`.
///
/// [`City`]: crate::domain::City
macro_rules! city_columns {
    () => {
        "c.id AS c_id, c.name AS c_name, c.country AS c_country"
    };
}

/// Columns of a [`Room`] and its [`RoomType`] aliased with the `r_` and
/// `rt_` prefixes, expecting `rooms` and `room_types` tables to be aliased as
/// `r` and `rt`.
///
/// [`Room`]: crate::domain::Room
/// [`RoomType`]: crate::domain::RoomType
macro_rules! room_columns {
    () => {
        "r.id AS r_id, r.hotel_id AS r_hotel_id, r.type_id AS r_type_id, \
         r.number AS r_number, r.floor AS r_floor, \
         r.is_available AS r_is_available, \
         ARRAY(\
            SELECT ra.amenity_id FROM room_amenities ra \
            WHERE ra.room_id = r.id \
            ORDER BY ra.amenity_id\
         ) AS r_amenities, \
         rt.id AS rt_id, rt.name AS rt_name, \
         rt.description AS rt_description, \
         rt.base_price AS rt_base_price, rt.currency AS rt_currency, \
         rt.capacity AS rt_capacity"
    };
}

/// Columns of a [`Booking`] aliased with the `b_` prefix, expecting
/// `bookings` table to be aliased as `b`.
///
/// [`Booking`]: crate::domain::Booking
macro_rules! booking_columns {
    () => {
        "b.id AS b_id, b.customer_id AS b_customer_id, \
         b.room_id AS b_room_id, \
         b.check_in AS b_check_in, b.check_out AS b_check_out, \
         b.total_price AS b_total_price, b.currency AS b_currency, \
         b.status AS b_status, b.booked_at AS b_booked_at"
    };
}

/// Selection of a [`read::hotel::Summary`] out of `hotels` table aliased as
/// `h`, to be followed by `WHERE` and `ORDER BY` clauses.
///
/// [`read::hotel::Summary`]: crate::read::hotel::Summary
macro_rules! hotel_summary_select {
    () => {
        concat!(
            "SELECT ",
            hotel_columns!(),
            ", ",
            city_columns!(),
            ", mp.min_price AS min_price, mp.currency AS currency \
             FROM hotels h \
             INNER JOIN cities c ON c.id = h.city_id \
             LEFT JOIN LATERAL (\
                SELECT rt.base_price AS min_price, rt.currency \
                FROM rooms r \
                INNER JOIN room_types rt ON rt.id = r.type_id \
                WHERE r.hotel_id = h.id \
                ORDER BY rt.base_price ASC \
                LIMIT 1\
             ) mp ON TRUE",
        )
    };
}

use {
    booking_columns, city_columns, hotel_columns, hotel_summary_select,
    room_columns,
};

impl Database<Transact> for Postgres<NonTx> {
    type Ok = Postgres<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Postgres(Tx::begin(&self.0).await.map_err(tracerr::wrap!())?))
    }
}

impl Database<Transact> for Postgres<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

#[async_trait]
impl AsyncTransaction for Postgres {
    type Error = Traced<database::Error>;

    async fn execute(
        &mut self,
        queries: &[&str],
    ) -> Result<usize, Self::Error> {
        let mut conn =
            self.0.connection().await.map_err(tracerr::wrap!())?;
        AsyncTransaction::execute(&mut **conn, queries)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

#[async_trait]
impl AsyncQuery<Vec<Migration>> for Postgres {
    async fn query(
        &mut self,
        query: &str,
    ) -> Result<Vec<Migration>, <Self as AsyncTransaction>::Error> {
        let mut conn =
            self.0.connection().await.map_err(tracerr::wrap!())?;
        AsyncQuery::query(&mut **conn, query)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl AsyncMigrate for Postgres {}
