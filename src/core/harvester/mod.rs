mod harvester;

pub use harvester::ListHarvester;
