//! [`Room`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Lock, Select},
    Money,
};
use itertools::Itertools as _;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{amenity, booking, room, Amenity, Room, RoomType},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::room_columns;

/// Maps the `r_`- and `rt_`-prefixed columns of the provided [`Row`] into a
/// [`Room`] and its [`RoomType`].
pub(super) fn room_from(row: &Row) -> (Room, RoomType) {
    (
        Room {
            id: row.get("r_id"),
            hotel_id: row.get("r_hotel_id"),
            type_id: row.get("r_type_id"),
            number: row.get("r_number"),
            floor: row.get("r_floor"),
            is_available: row.get("r_is_available"),
            amenities: row.get("r_amenities"),
        },
        RoomType {
            id: row.get("rt_id"),
            name: row.get("rt_name"),
            description: row.get("rt_description"),
            base_price: Money::new(
                row.get("rt_base_price"),
                row.get("rt_currency"),
            ),
            capacity: row.get("rt_capacity"),
        },
    )
}

/// Builds [`read::room::Details`] out of the provided [`Room`] `rows`,
/// loading their [`Amenity`]s.
pub(super) async fn details_from<C: Connection>(
    conn: &C,
    rows: Vec<Row>,
) -> Result<Vec<read::room::Details>, Traced<database::Error>> {
    let rooms = rows.iter().map(room_from).collect::<Vec<_>>();
    let ids = rooms
        .iter()
        .flat_map(|(r, _)| r.amenities.iter().copied())
        .unique()
        .collect::<Vec<amenity::Id>>();

    let mut amenities = HashMap::new();
    if !ids.is_empty() {
        const SQL: &str = "\
            SELECT id, name, description \
            FROM amenities \
            WHERE id = ANY($1::UUID[])";
        amenities = conn
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Amenity {
                        id,
                        name: row.get("name"),
                        description: row.get("description"),
                    },
                )
            })
            .collect::<HashMap<amenity::Id, Amenity>>();
    }

    Ok(rooms
        .into_iter()
        .map(|(room, room_type)| read::room::Details {
            amenities: room
                .amenities
                .iter()
                .filter_map(|id| amenities.get(id).cloned())
                .collect(),
            room,
            room_type,
        })
        .collect())
}

impl<C> Database<Select<By<Option<read::room::Details>, room::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::room::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::room::Details>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            room_columns!(),
            " FROM rooms r \
             INNER JOIN room_types rt ON rt.id = r.type_id \
             WHERE r.id = $1::UUID",
        );
        let rows = self
            .query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(details_from(&**self, rows)
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl<C> Database<Select<By<Vec<read::room::Details>, read::room::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::room::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::room::Details>, read::room::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::room::list::Filter {
            hotel_id,
            available_for,
            guests,
        } = by.into_inner();
        let check_in = available_for.map(|s| s.check_in());
        let check_out = available_for.map(|s| s.check_out());

        const SQL: &str = concat!(
            "SELECT ",
            room_columns!(),
            " FROM rooms r \
             INNER JOIN room_types rt ON rt.id = r.type_id \
             WHERE ($1::UUID IS NULL OR r.hotel_id = $1::UUID) \
                   AND ($2::DATE IS NULL OR (\
                        r.is_available AND NOT EXISTS (\
                            SELECT 1 FROM bookings b \
                            WHERE b.room_id = r.id \
                                  AND b.status <> $4::INT2 \
                                  AND b.check_in < $3::DATE \
                                  AND b.check_out > $2::DATE\
                        )\
                   )) \
                   AND ($5::INT2 IS NULL OR rt.capacity >= $5::INT2) \
             ORDER BY r.number ASC, r.id ASC",
        );
        let rows = self
            .query(
                SQL,
                &[
                    &hotel_id,
                    &check_in,
                    &check_out,
                    &booking::Status::Cancelled,
                    &guests,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;
        details_from(&**self, rows).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<read::room::IsAvailable, read::room::Availability>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::room::IsAvailable;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::room::IsAvailable, read::room::Availability>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::room::Availability { room_id, stay } = by.into_inner();

        const SQL: &str = "\
            SELECT NOT EXISTS (\
                SELECT 1 FROM bookings \
                WHERE room_id = $1::UUID \
                      AND status <> $2::INT2 \
                      AND check_in < $4::DATE \
                      AND check_out > $3::DATE\
            ) AS available";
        Ok(read::room::IsAvailable(
            self.query_opt(
                SQL,
                &[
                    &room_id,
                    &booking::Status::Cancelled,
                    &stay.check_in(),
                    &stay.check_out(),
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .is_some_and(|row| row.get("available")),
        ))
    }
}

impl<C> Database<Lock<By<Room, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rooms \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
