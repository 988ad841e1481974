mod option;
mod scalar;
mod tuple;
