//! [`Favorite`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{customer, favorite, Favorite},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::{
    city_columns, hotel::summary_from, hotel_columns, hotel_summary_select,
};

impl<C> Database<Insert<Favorite>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(favorite): Insert<Favorite>,
    ) -> Result<Self::Ok, Self::Err> {
        let Favorite {
            customer_id,
            hotel_id,
            added_at,
        } = favorite;

        const SQL: &str = "\
            INSERT INTO favorites (customer_id, hotel_id, added_at) \
            VALUES ($1::UUID, $2::UUID, $3::TIMESTAMPTZ) \
            ON CONFLICT (customer_id, hotel_id) DO NOTHING";
        self.exec(SQL, &[&customer_id, &hotel_id, &added_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Favorite, favorite::Key>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Favorite, favorite::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let favorite::Key {
            customer_id,
            hotel_id,
        } = by.into_inner();

        const SQL: &str = "\
            DELETE FROM favorites \
            WHERE customer_id = $1::UUID \
              AND hotel_id = $2::UUID";
        self.exec(SQL, &[&customer_id, &hotel_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::hotel::Summary>, customer::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::hotel::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::hotel::Summary>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let customer_id = by.into_inner();

        const SQL: &str = concat!(
            hotel_summary_select!(),
            " WHERE h.id IN (\
                SELECT f.hotel_id FROM favorites f \
                WHERE f.customer_id = $1::UUID\
             ) \
             ORDER BY h.star_rating DESC, h.id ASC",
        );
        Ok(self
            .query(SQL, &[&customer_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(summary_from)
            .collect())
    }
}
