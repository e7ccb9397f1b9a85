mod api;
mod split;
