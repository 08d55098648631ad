//! [`Query`] definition.

pub mod booking;
pub mod bookings;
pub mod customer;
pub mod favorites;
pub mod hotel;
pub mod hotels;
pub mod reviews;
pub mod room;
pub mod rooms;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, Ntf, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db, Ntf>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::pagination::Order;

    use crate::{
        command::CreateBooking,
        domain::{booking::Stay, hotel::StarRating},
        read::{
            self,
            hotel::{recommended, search},
        },
        test::{self, date, usd},
        Command as _, Query as _,
    };

    use super::{hotels, rooms};

    fn selector(filter: search::Filter) -> search::Selector {
        search::Selector {
            arguments: search::Arguments::new(
                None,
                None,
                search::DEFAULT_PAGE_SIZE,
            )
            .unwrap(),
            filter,
            sort: search::Sort::default(),
        }
    }

    #[tokio::test]
    async fn searches_hotels_by_min_stars() {
        let svc = test::service();
        let city = test::city(&svc, "Tbilisi").await;
        for (name, stars) in [("Three", 3), ("Four", 4), ("Five", 5)] {
            _ = test::hotel(&svc, &city, name, stars).await;
        }

        let page = svc
            .execute(hotels::Search::by(selector(search::Filter {
                min_stars: StarRating::new(4),
                ..search::Filter::default()
            })))
            .await
            .unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages(), 1);
        let names = page
            .items
            .iter()
            .map(|s| AsRef::<str>::as_ref(&s.hotel.name))
            .collect::<Vec<_>>();
        assert_eq!(names, ["Five", "Four"]);
    }

    #[tokio::test]
    async fn paginates_after_sorting() {
        let svc = test::service();
        let city = test::city(&svc, "Batumi").await;
        let room_type = test::room_type(&svc, usd(100), 2).await;
        for (name, stars) in
            [("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5)]
        {
            let hotel = test::hotel(&svc, &city, name, stars).await;
            _ = test::room(&svc, &hotel, &room_type, &[]).await;
        }

        let page = svc
            .execute(hotels::Search::by(search::Selector {
                arguments: search::Arguments::new(Some(2), Some(2), 10)
                    .unwrap(),
                filter: search::Filter::default(),
                sort: search::Sort {
                    by: search::SortBy::Name,
                    order: Order::Ascending,
                },
            }))
            .await
            .unwrap();

        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages(), 3);
        let names = page
            .items
            .iter()
            .map(|s| AsRef::<str>::as_ref(&s.hotel.name))
            .collect::<Vec<_>>();
        assert_eq!(names, ["C", "D"]);
        assert!(page.items.iter().all(|s| s.min_price == Some(usd(100))));
    }

    #[tokio::test]
    async fn lists_available_rooms() {
        let svc = test::service();
        let city = test::city(&svc, "Telavi").await;
        let hotel = test::hotel(&svc, &city, "Garden", 3).await;
        let room_type = test::room_type(&svc, usd(70), 2).await;
        let room = test::room(&svc, &hotel, &room_type, &[]).await;
        let stay = Stay::new(date("2025-01-05"), date("2025-01-08")).unwrap();

        let available = svc
            .execute(rooms::List::by(read::room::list::Filter {
                hotel_id: Some(hotel.id),
                available_for: Some(stay),
                guests: None,
            }))
            .await
            .unwrap();
        assert_eq!(available.len(), 1);

        let is_available = svc
            .execute(super::room::IsAvailable::by(read::room::Availability {
                room_id: room.id,
                stay,
            }))
            .await
            .unwrap();
        assert!(*is_available);
    }

    #[tokio::test]
    async fn recommends_similar_hotels_in_visited_cities() {
        let svc = test::service();
        let (home, away) = (
            test::city(&svc, "Tbilisi").await,
            test::city(&svc, "Batumi").await,
        );
        let booked = test::hotel(&svc, &home, "Booked", 4).await;
        let grand = test::hotel(&svc, &home, "Grand", 5).await;
        _ = test::hotel(&svc, &home, "Hostel", 2).await;
        _ = test::hotel(&svc, &away, "Remote", 4).await;
        let room_type = test::room_type(&svc, usd(100), 2).await;
        let room = test::room(&svc, &booked, &room_type, &[]).await;
        let customer =
            test::customer(&svc, "irakli@example.com", "Secret123!").await;
        let newcomer =
            test::customer(&svc, "sopo@example.com", "Secret123!").await;
        _ = svc
            .execute(CreateBooking {
                customer_id: customer.id,
                room_id: room.id,
                check_in: date("2025-01-05"),
                check_out: date("2025-01-08"),
            })
            .await
            .unwrap();
        let recommend = |customer_id, count| {
            hotels::Recommended::by(recommended::Selector {
                customer_id,
                count,
            })
        };

        let found = svc
            .execute(recommend(customer.id, recommended::DEFAULT_COUNT))
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|s| s.hotel.id).collect();
        assert_eq!(ids, [grand.id, booked.id]);
        assert!(found.iter().all(|s| s.city.id == home.id));

        let found = svc.execute(recommend(customer.id, 1)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].hotel.id, grand.id);

        let found = svc
            .execute(recommend(newcomer.id, recommended::DEFAULT_COUNT))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
