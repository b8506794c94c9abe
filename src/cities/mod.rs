pub mod city_locator;
pub mod error;
