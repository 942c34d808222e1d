//! Services attached to the graph by real-time updaters.
//!
//! Updaters register their service during setup and remove it again on
//! teardown. Both happen inside graph writer units.

pub mod bike_rental;
pub mod car_park;
pub mod roadworks;

pub use bike_rental::{BikeRentalStation, BikeRentalStationService, NetworkSet, RentalType};
pub use car_park::{CarPark, CarParkService};
pub use roadworks::RoadworksSource;

#[derive(Debug, Clone, Default)]
pub struct GraphServices {
    roadworks: Option<RoadworksSource>,
    car_parks: Option<CarParkService>,
    bike_rental: Option<BikeRentalStationService>,
}

impl GraphServices {
    pub fn roadworks(&self) -> Option<&RoadworksSource> {
        self.roadworks.as_ref()
    }

    /// Registers a roadworks source, replacing any previous one
    pub fn set_roadworks(&mut self, source: RoadworksSource) {
        self.roadworks = Some(source);
    }

    pub fn remove_roadworks(&mut self) -> Option<RoadworksSource> {
        self.roadworks.take()
    }

    pub fn car_parks(&self) -> Option<&CarParkService> {
        self.car_parks.as_ref()
    }

    /// Car park service, created on first access
    pub fn car_parks_mut(&mut self) -> &mut CarParkService {
        self.car_parks.get_or_insert_with(CarParkService::default)
    }

    pub fn remove_car_parks(&mut self) -> Option<CarParkService> {
        self.car_parks.take()
    }

    pub fn bike_rental(&self) -> Option<&BikeRentalStationService> {
        self.bike_rental.as_ref()
    }

    /// Bike rental service, created on first access
    pub fn bike_rental_mut(&mut self) -> &mut BikeRentalStationService {
        self.bike_rental
            .get_or_insert_with(BikeRentalStationService::default)
    }

    pub fn remove_bike_rental(&mut self) -> Option<BikeRentalStationService> {
        self.bike_rental.take()
    }
}
