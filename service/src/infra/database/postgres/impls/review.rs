//! [`Review`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{hotel, Review},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Vec<Review>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let hotel_id = by.into_inner();

        const SQL: &str = "\
            SELECT rv.id, rv.booking_id, \
                   rv.rating, rv.comment, \
                   rv.created_at \
            FROM reviews rv \
            INNER JOIN bookings b ON b.id = rv.booking_id \
            INNER JOIN rooms r ON r.id = b.room_id \
            WHERE r.hotel_id = $1::UUID \
            ORDER BY rv.created_at DESC, rv.id DESC";
        Ok(self
            .query(SQL, &[&hotel_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Review {
                id: row.get("id"),
                booking_id: row.get("booking_id"),
                rating: row.get("rating"),
                comment: row.get("comment"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Review>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let Review {
            id,
            booking_id,
            rating,
            comment,
            created_at,
        } = review;

        const SQL: &str = "\
            INSERT INTO reviews (\
                id, booking_id, \
                rating, comment, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::INT2, $4::VARCHAR, \
                $5::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[&id, &booking_id, &rating, &comment, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
