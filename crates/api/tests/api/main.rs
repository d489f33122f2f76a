mod helpers;
mod precipitation;
mod stations;
