use crate::common::check;

#[test]
fn simple_rewrite() {
    check(
        r#"
module foo;
  /* bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a[]),
         .o2(out_b[])
     ); */
  bar b (  /*AUTOINST*/);
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule
"#,
        r#"
module foo;
  /* bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a[]),
         .o2(out_b[])
     ); */
  bar b (  /*AUTOINST*/
      // Inputs
      .i1(in_a),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(out_b  /*[31:0].[8]*/)
  );
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule
"#,
    );
}

#[test]
fn preconnected_ports_win_over_templates() {
    check(
        r#"
module foo;
  /* bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a),
         .o2(out_b)
     ); */
  bar b (  // An explanatory comment before the directive keeps the
      // connection list opening on its own line.
      .i1(input_1),  /*AUTOINST*/
  );
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule
"#,
        r#"
module foo;
  /* bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a),
         .o2(out_b)
     ); */
  bar b (  // An explanatory comment before the directive keeps the
      // connection list opening on its own line.
      .i1(input_1),  /*AUTOINST*/
      // Inputs
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(out_b)
  );
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule
"#,
    );
}

#[test]
fn chained_headers_match_several_modules() {
    check(
        r#"
module foo;
  /* qux AUTO_TEMPLATE
     quux AUTO_TEMPLATE
     bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a),
         .o2(out_b[])); */
  qux q (  /*AUTOINST*/);
  bar b (  /*AUTOINST*/);
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule

module qux;
  input i1;
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule
"#,
        r#"
module foo;
  /* qux AUTO_TEMPLATE
     quux AUTO_TEMPLATE
     bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a),
         .o2(out_b[])); */
  qux q (  /*AUTOINST*/
      // Inputs
      .i1(in_a),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o2(out_b  /*[31:0].[8]*/)
  );
  bar b (  /*AUTOINST*/
      // Inputs
      .i1(in_a),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(out_b  /*[31:0].[8]*/)
  );
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule

module qux;
  input i1;
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule
"#,
    );
}

#[test]
fn later_block_overrides_earlier() {
    check(
        r#"
module foo;
  /* qux AUTO_TEMPLATE
     bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a[]),
         .o2(out_b[])); */
  qux q (  /*AUTOINST*/);

  /* bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(input_1[]),
         .o2(output_2),
         .i2(input_2[]),
         .io(input_output),
         .o1(output_1[])); */
  bar b (  /*AUTOINST*/);
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule

module qux;
  input i1;
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule
"#,
        r#"
module foo;
  /* qux AUTO_TEMPLATE
     bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a[]),
         .o2(out_b[])); */
  qux q (  /*AUTOINST*/
      // Inputs
      .i1(in_a),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o2(out_b  /*[31:0].[8]*/)
  );

  /* bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(input_1[]),
         .o2(output_2),
         .i2(input_2[]),
         .io(input_output),
         .o1(output_1[])); */
  bar b (  /*AUTOINST*/
      // Inputs
      .i1(input_1),
      .i2(input_2  /*.[4][8]*/),
      // Inouts
      .io(input_output),
      // Outputs
      .o1(output_1[15:0]),
      .o2(output_2)
  );
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule

module qux;
  input i1;
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule
"#,
    );
}

#[test]
fn unmatched_module_uses_defaults() {
    check(
        r#"
module foo;
  /* quux AUTO_TEMPLATE
     bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a[]),
         .o2(out_b[])); */
  qux q (  /*AUTOINST*/);
  bar b (  /*AUTOINST*/);
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule

module qux;
  input i1;
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule
"#,
        r#"
module foo;
  /* quux AUTO_TEMPLATE
     bar AUTO_TEMPLATE "some_regex_ignored" (
         .i1(in_a[]),
         .o2(out_b[])); */
  qux q (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o2(o2  /*[31:0].[8]*/)
  );
  bar b (  /*AUTOINST*/
      // Inputs
      .i1(in_a),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(out_b  /*[31:0].[8]*/)
  );
endmodule

module bar;
  input i1;
  input i2[4][8];
  inout [7:0][7:0] io;
  output [15:0] o1;
  output [31:0] o2[8];
endmodule

module qux;
  input i1;
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule
"#,
    );
}

#[test]
fn scalar_port_with_slice_template_drops_the_slice() {
    check(
        r#"
module foo;
  /* bar AUTO_TEMPLATE (
         .i1(input_1[])); */
  bar b (  /*AUTOINST*/);
endmodule

module bar;
  input i1;
endmodule
"#,
        r#"
module foo;
  /* bar AUTO_TEMPLATE (
         .i1(input_1[])); */
  bar b (  /*AUTOINST*/
      // Inputs
      .i1(input_1)
  );
endmodule

module bar;
  input i1;
endmodule
"#,
    );
}
