//! [`Booking`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Stay},
        Booking,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
    read,
};

use super::{
    booking_columns, hotel::hotel_from, hotel_columns, room::details_from,
    room_columns,
};

/// Maps the `b_`-prefixed columns of the provided [`Row`] into a [`Booking`].
fn booking_from(row: &Row) -> Result<Booking, Traced<database::Error>> {
    let stay = Stay::new(row.get("b_check_in"), row.get("b_check_out"))
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)?;
    Ok(Booking {
        id: row.get("b_id"),
        customer_id: row.get("b_customer_id"),
        room_id: row.get("b_room_id"),
        stay,
        total_price: Money::new(
            row.get("b_total_price"),
            row.get("b_currency"),
        ),
        status: row.get("b_status"),
        booked_at: row.get("b_booked_at"),
    })
}

/// Builds [`read::booking::Details`] out of the provided `rows`.
async fn details_of<C: Connection>(
    conn: &C,
    rows: Vec<Row>,
) -> Result<Vec<read::booking::Details>, Traced<database::Error>> {
    let bookings = rows
        .iter()
        .map(|row| Ok((booking_from(row)?, hotel_from(row))))
        .collect::<Result<Vec<_>, Traced<database::Error>>>()
        .map_err(tracerr::wrap!())?;
    let rooms = details_from(conn, rows).await.map_err(tracerr::wrap!())?;

    Ok(bookings
        .into_iter()
        .zip(rooms)
        .map(|((booking, hotel), room)| read::booking::Details {
            booking,
            room: room.room,
            room_type: room.room_type,
            hotel,
        })
        .collect())
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            booking_columns!(),
            " FROM bookings b \
             WHERE b.id = $1::UUID",
        );
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| booking_from(&row))
            .transpose()
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<read::booking::Details>, booking::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::booking::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::booking::Details>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            booking_columns!(),
            ", ",
            room_columns!(),
            ", ",
            hotel_columns!(),
            " FROM bookings b \
             INNER JOIN rooms r ON r.id = b.room_id \
             INNER JOIN room_types rt ON rt.id = r.type_id \
             INNER JOIN hotels h ON h.id = r.hotel_id \
             WHERE b.id = $1::UUID",
        );
        let rows = self
            .query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(details_of(&**self, rows)
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl<C>
    Database<
        Select<By<Vec<read::booking::Details>, read::booking::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::booking::Details>, read::booking::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Filter { customer_id } = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            booking_columns!(),
            ", ",
            room_columns!(),
            ", ",
            hotel_columns!(),
            " FROM bookings b \
             INNER JOIN rooms r ON r.id = b.room_id \
             INNER JOIN room_types rt ON rt.id = r.type_id \
             INNER JOIN hotels h ON h.id = r.hotel_id \
             WHERE ($1::UUID IS NULL OR b.customer_id = $1::UUID) \
             ORDER BY b.booked_at DESC, b.id DESC",
        );
        let rows = self
            .query(SQL, &[&customer_id])
            .await
            .map_err(tracerr::wrap!())?;
        details_of(&**self, rows).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Booking>, read::booking::StayedAt>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, read::booking::StayedAt>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::StayedAt {
            customer_id,
            hotel_id,
        } = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            booking_columns!(),
            " FROM bookings b \
             INNER JOIN rooms r ON r.id = b.room_id \
             WHERE b.customer_id = $1::UUID \
                   AND r.hotel_id = $2::UUID \
                   AND b.status <> $3::INT2 \
             ORDER BY b.booked_at DESC, b.id DESC \
             LIMIT 1",
        );
        self.query_opt(
            SQL,
            &[&customer_id, &hotel_id, &booking::Status::Cancelled],
        )
        .await
        .map_err(tracerr::wrap!())?
        .map(|row| booking_from(&row))
        .transpose()
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            customer_id,
            room_id,
            stay,
            total_price,
            status,
            booked_at,
        } = booking;

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, customer_id, room_id, \
                check_in, check_out, \
                total_price, currency, \
                status, booked_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::DATE, $5::DATE, \
                $6::NUMERIC, $7::INT2, \
                $8::INT2, $9::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &customer_id,
                &room_id,
                &stay.check_in(),
                &stay.check_out(),
                &total_price.amount,
                &total_price.currency,
                &status,
                &booked_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE bookings \
            SET status = $2::INT2 \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&booking.id, &booking.status])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
