pub mod city;
pub mod observation;
pub mod precipitation_frame;
