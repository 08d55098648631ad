//! [`Hotel`]-related [`Database`] implementations.

use common::{
    money::Currency,
    operations::{By, Select},
    Money,
};
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{hotel, City, Hotel},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{
        self,
        hotel::{
            recommended,
            search::{self, SortBy},
        },
    },
};

use super::{city_columns, hotel_columns, hotel_summary_select};

/// Maps the `h_`-prefixed columns of the provided [`Row`] into a [`Hotel`].
pub(super) fn hotel_from(row: &Row) -> Hotel {
    Hotel {
        id: row.get("h_id"),
        name: row.get("h_name"),
        star_rating: row.get("h_star_rating"),
        description: row.get("h_description"),
        phone: row.get("h_phone"),
        email: row.get("h_email"),
        image_url: row.get("h_image_url"),
        street: row.get("h_street"),
        city_id: row.get("h_city_id"),
        created_at: row.get("h_created_at"),
    }
}

/// Maps the `c_`-prefixed columns of the provided [`Row`] into a [`City`].
fn city_from(row: &Row) -> City {
    City {
        id: row.get("c_id"),
        name: row.get("c_name"),
        country: row.get("c_country"),
    }
}

/// Maps a [`Row`] selected with [`hotel_summary_select!`] into a
/// [`read::hotel::Summary`].
pub(super) fn summary_from(row: &Row) -> read::hotel::Summary {
    let amount: Option<Decimal> = row.get("min_price");
    let currency: Option<Currency> = row.get("currency");
    read::hotel::Summary {
        hotel: hotel_from(row),
        city: city_from(row),
        min_price: amount.zip(currency).map(|(a, c)| Money::new(a, c)),
    }
}

impl<C> Database<Select<By<Option<Hotel>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Hotel>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            hotel_columns!(),
            " FROM hotels h \
             WHERE h.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| hotel_from(&row)))
    }
}

impl<C> Database<Select<By<Option<read::hotel::Details>, hotel::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Vec<read::room::Details>, read::room::list::Filter>>,
        Ok = Vec<read::room::Details>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<read::hotel::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::hotel::Details>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            hotel_columns!(),
            ", ",
            city_columns!(),
            " FROM hotels h \
             INNER JOIN cities c ON c.id = h.city_id \
             WHERE h.id = $1::UUID",
        );
        let Some(row) = self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let rooms = self
            .execute(Select(By::new(read::room::list::Filter {
                hotel_id: Some(id),
                ..read::room::list::Filter::default()
            })))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(read::hotel::Details {
            hotel: hotel_from(&row),
            city: city_from(&row),
            rooms,
        }))
    }
}

/// Conditions of [`search::Filter`] over `hotels` table aliased as `h`.
///
/// Parameters are: `$1` city ID, `$2` minimal stars, `$3` maximal stars,
/// `$4` minimal price, `$5` maximal price, `$6` amenity IDs, `$7` guests,
/// `$8` room type ID.
const SEARCH_CONDITIONS: &str = "\
    ($1::UUID IS NULL OR h.city_id = $1::UUID) \
    AND ($2::INT2 IS NULL OR h.star_rating >= $2::INT2) \
    AND ($3::INT2 IS NULL OR h.star_rating <= $3::INT2) \
    AND ($4::NUMERIC IS NULL OR EXISTS (\
        SELECT 1 FROM rooms r \
        INNER JOIN room_types rt ON rt.id = r.type_id \
        WHERE r.hotel_id = h.id AND rt.base_price >= $4::NUMERIC\
    )) \
    AND ($5::NUMERIC IS NULL OR EXISTS (\
        SELECT 1 FROM rooms r \
        INNER JOIN room_types rt ON rt.id = r.type_id \
        WHERE r.hotel_id = h.id AND rt.base_price <= $5::NUMERIC\
    )) \
    AND (cardinality($6::UUID[]) = 0 OR EXISTS (\
        SELECT 1 FROM rooms r \
        INNER JOIN room_amenities ra ON ra.room_id = r.id \
        WHERE r.hotel_id = h.id AND ra.amenity_id = ANY($6::UUID[])\
    )) \
    AND ($7::INT2 IS NULL OR EXISTS (\
        SELECT 1 FROM rooms r \
        INNER JOIN room_types rt ON rt.id = r.type_id \
        WHERE r.hotel_id = h.id \
              AND r.is_available \
              AND rt.capacity >= $7::INT2\
    )) \
    AND ($8::UUID IS NULL OR EXISTS (\
        SELECT 1 FROM rooms r \
        WHERE r.hotel_id = h.id \
              AND r.is_available \
              AND r.type_id = $8::UUID\
    ))";

impl<C> Database<Select<By<search::Page, search::Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = search::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<search::Page, search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let search::Selector {
            arguments,
            filter,
            sort,
        } = by.into_inner();

        let filter_params: [&(dyn ToSql + Sync); 8] = [
            &filter.city_id,
            &filter.min_stars,
            &filter.max_stars,
            &filter.min_price,
            &filter.max_price,
            &filter.amenities,
            &filter.guests,
            &filter.room_type_id,
        ];

        let count_sql =
            format!("SELECT COUNT(*) FROM hotels h WHERE {SEARCH_CONDITIONS}");
        let total_count = self
            .query_opt(count_sql.as_str(), &filter_params)
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i64>(0));

        let order = sort.order.sql();
        let key = match sort.by {
            SortBy::Rating => "h.star_rating",
            SortBy::Price => "mp.min_price",
            SortBy::Name => "h.name",
        };
        let sql = format!(
            "{select} \
             WHERE {SEARCH_CONDITIONS} \
             ORDER BY {key} {order} NULLS LAST, h.id ASC \
             LIMIT $9::INT8 OFFSET $10::INT8",
            select = hotel_summary_select!(),
        );
        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);
        let paging: [&(dyn ToSql + Sync); 2] = [&limit, &offset];
        let params = [filter_params.as_slice(), paging.as_slice()].concat();

        let items: Vec<_> = self
            .query(sql.as_str(), &params)
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(summary_from)
            .collect();

        Ok(search::Page::new(
            arguments,
            items,
            u64::try_from(total_count).unwrap_or_default(),
        ))
    }
}

impl<C> Database<Select<By<Vec<read::hotel::Summary>, recommended::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::hotel::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::hotel::Summary>, recommended::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let recommended::Selector { customer_id, count } = by.into_inner();

        // Mirrors `recommended::Preferences`: no bookings yield a `NULL`
        // average, matching nothing.
        const SQL: &str = concat!(
            "WITH booked AS (\
                SELECT bh.city_id, bh.star_rating \
                FROM bookings b \
                INNER JOIN rooms br ON br.id = b.room_id \
                INNER JOIN hotels bh ON bh.id = br.hotel_id \
                WHERE b.customer_id = $1::UUID\
             ) ",
            hotel_summary_select!(),
            " WHERE h.city_id IN (SELECT city_id FROM booked) \
               AND abs(h.star_rating - (\
                   SELECT avg(star_rating) FROM booked\
               )) <= 1 \
             ORDER BY h.star_rating DESC, h.id ASC \
             LIMIT $2::INT8",
        );
        let limit = i64::from(count);
        Ok(self
            .query(SQL, &[&customer_id, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(summary_from)
            .collect())
    }
}
